//! Syntax highlighting for fenced code blocks. The markdown renderer calls a
//! [`Highlighter`] with each block's code and declared language;
//! [`SyntectHighlighter`] emits class-based `<span>` markup, so colors come
//! from the site's stylesheet rather than inline styles.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// The highlight hook.
pub trait Highlighter {
    /// Returns highlighted HTML for `code`, which is written in `language`.
    /// Fails with [`Error::UnknownLanguage`] when the language isn't
    /// recognized.
    fn highlight(&self, code: &str, language: &str) -> Result<String>;
}

pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
}

impl SyntectHighlighter {
    /// Loads syntect's bundled syntax definitions.
    pub fn new() -> SyntectHighlighter {
        SyntectHighlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            class_style: ClassStyle::Spaced,
        }
    }

    fn find_syntax(&self, token: &str) -> Option<&SyntaxReference> {
        let lowercase = token.to_ascii_lowercase();
        self.syntax_set
            .find_syntax_by_token(&lowercase)
            .or_else(|| self.syntax_set.find_syntax_by_name(token))
            .or_else(|| self.syntax_set.find_syntax_by_extension(&lowercase))
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| Error::UnknownLanguage(language.to_owned()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, self.class_style);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| Error::Highlighting {
                    language: language.to_owned(),
                    message: err.to_string(),
                })?;
        }
        Ok(generator.finalize())
    }
}

/// The result of a highlighting operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error highlighting a code block.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a code block declares a language with no known syntax.
    #[error("unknown code block language `{0}`")]
    UnknownLanguage(String),

    /// Returned when the syntax definition fails partway through a block.
    #[error("highlighting `{language}` code: {message}")]
    Highlighting { language: String, message: String },
}
