use crate::highlight::{self, Highlighter};
use pulldown_cmark::escape::escape_html;
use pulldown_cmark::*;
use std::io;

/// Converts a markdown body into HTML, routing fenced code blocks through a
/// [`Highlighter`].
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str, highlighter: &dyn Highlighter) -> Result<String>;
}

/// A [`MarkdownRenderer`] backed by [`pulldown_cmark`] with the GitHub-style
/// extensions (tables, strikethrough, task lists, footnotes) enabled.
///
/// A fenced code block whose info string names a language is replaced with
/// `<pre><code class="language-{lang}">…</code></pre>` holding the
/// highlighter's output. Blocks without a language, and indented blocks, are
/// rendered by [`pulldown_cmark`] as escaped plain text.
#[derive(Clone, Copy, Debug)]
pub struct CmarkRenderer {
    options: Options,
}

impl CmarkRenderer {
    pub fn new() -> CmarkRenderer {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        CmarkRenderer { options }
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str, highlighter: &dyn Highlighter) -> Result<String> {
        let mut events: Vec<Event> = Vec::new();

        // (language, code) of the fenced block currently being collected
        let mut block: Option<(String, String)> = None;

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                    if !language(info).is_empty() =>
                {
                    block = Some((language(info).to_owned(), String::new()));
                }
                Event::Text(ref text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(text);
                    }
                }
                Event::End(Tag::CodeBlock(_)) if block.is_some() => {
                    if let Some((language, code)) = block.take() {
                        let html = code_block_html(&language, &code, highlighter)?;
                        events.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                    }
                }
                event => events.push(event),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html, events.into_iter());
        Ok(html)
    }
}

// The language is the first word of a fence's info string (```rust,ignore is
// taken verbatim as `rust,ignore`).
fn language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}

fn code_block_html(language: &str, code: &str, highlighter: &dyn Highlighter) -> Result<String> {
    let highlighted = highlighter.highlight(code, language)?;
    let mut html = String::from("<pre><code class=\"language-");
    escape_html(&mut html, language)?;
    html.push_str("\">");
    html.push_str(&highlighted);
    html.push_str("</code></pre>\n");
    Ok(html)
}

/// The result of a markdown rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error converting markdown to HTML.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a code block can't be highlighted.
    #[error(transparent)]
    Highlight(#[from] highlight::Error),

    /// Returned for I/O errors from the HTML writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    /// Wraps code in a marker so tests can see what the hook received.
    struct Brackets;

    impl Highlighter for Brackets {
        fn highlight(&self, code: &str, language: &str) -> highlight::Result<String> {
            match language {
                "nope" => Err(highlight::Error::UnknownLanguage(language.to_owned())),
                _ => Ok(format!("[{}:{}]", language, code)),
            }
        }
    }

    #[test]
    fn test_render_heading() -> Result<()> {
        let html = CmarkRenderer::new().render("# Hi", &Brackets)?;
        assert_eq!("<h1>Hi</h1>\n", html);
        Ok(())
    }

    #[test]
    fn test_fenced_block_goes_through_hook() -> Result<()> {
        let html = CmarkRenderer::new().render("```js\nconsole.log(1)\n```", &Brackets)?;
        assert_eq!(
            "<pre><code class=\"language-js\">[js:console.log(1)\n]</code></pre>\n",
            html
        );
        Ok(())
    }

    #[test]
    fn test_info_string_extra_words_ignored() -> Result<()> {
        let html = CmarkRenderer::new().render("```rust title=x\nfn f() {}\n```", &Brackets)?;
        assert!(html.contains("language-rust"));
        assert!(html.contains("[rust:fn f() {}\n]"));
        Ok(())
    }

    #[test]
    fn test_unlabeled_block_is_plain() -> Result<()> {
        let html = CmarkRenderer::new().render("```\na < b\n```", &Brackets)?;
        assert_eq!("<pre><code>a &lt; b\n</code></pre>\n", html);
        Ok(())
    }

    #[test]
    fn test_hook_error_propagates() {
        assert!(matches!(
            CmarkRenderer::new().render("```nope\nx\n```", &Brackets),
            Err(Error::Highlight(highlight::Error::UnknownLanguage(_)))
        ));
    }

    #[test]
    fn test_tables_enabled() -> Result<()> {
        let html = CmarkRenderer::new().render("| a |\n|---|\n| b |\n", &Brackets)?;
        assert!(html.contains("<table>"));
        Ok(())
    }
}
