//! The post pipeline: reads each post source file, renders its markdown body,
//! and fills the post template's `{head}`, `{header}`, and `{content}`
//! placeholders. Also home to the small formatting helpers (output paths and
//! human-readable dates) shared with the index.

use crate::config::Site;
use crate::frontmatter::{self, FrontmatterParser};
use crate::highlight::Highlighter;
use crate::markdown::{self, MarkdownRenderer};
use crate::page::RenderedPage;
use crate::template::{replace_template_variables, Replacement};
use chrono::NaiveDateTime;
use std::io;
use std::path::{Path, PathBuf};

/// A post as needed to render its own page.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub title: String,
    pub date: NaiveDateTime,
    pub description: String,

    /// The markdown body, not yet rendered.
    pub body: String,

    /// The post's file name within the posts directory (e.g. `hello.md`).
    pub source_filename: String,
}

/// Reads and renders posts. Holds the collaborators every post needs so
/// they're resolved once per build.
pub struct Pipeline<'a> {
    /// The contents of `templates/post.html`.
    pub template: &'a str,
    pub site: &'a Site,
    pub parser: &'a dyn FrontmatterParser,
    pub renderer: &'a dyn MarkdownRenderer,
    pub highlighter: &'a dyn Highlighter,
}

impl Pipeline<'_> {
    /// Reads a post source file. `title`, `date`, and `description` are all
    /// required.
    pub fn read_post(&self, path: &Path) -> Result<Post> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Read {
            path: path.to_owned(),
            err,
        })?;
        let annotate = |err| Error::Frontmatter {
            path: path.to_owned(),
            err,
        };
        let document = self.parser.parse(&contents).map_err(annotate)?;
        let attributes = &document.attributes;
        let source_filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;

        Ok(Post {
            title: attributes.title().map_err(annotate)?.to_owned(),
            date: attributes.date().map_err(annotate)?,
            description: attributes.description().map_err(annotate)?.to_owned(),
            source_filename: source_filename.to_owned(),
            body: document.body,
        })
    }

    /// Renders a post into its output page.
    pub fn render_post(&self, post: &Post) -> Result<RenderedPage> {
        let content = self
            .renderer
            .render(&post.body, self.highlighter)
            .map_err(|err| Error::Markdown {
                source_filename: post.source_filename.clone(),
                err,
            })?;
        let head = create_head(post, self.site)?;
        let header = create_post_header(&post.title, &format_date(&post.date));

        Ok(RenderedPage {
            path: post_path(&post.title),
            html: replace_template_variables(
                self.template,
                &[
                    Replacement::new("head", head),
                    Replacement::new("header", header),
                    Replacement::new("content", content),
                ],
            ),
        })
    }

    /// Reads and renders every post in `paths`, in order. The first failure
    /// aborts the rest.
    pub fn render_posts(&self, paths: &[PathBuf]) -> Result<Vec<RenderedPage>> {
        paths
            .iter()
            .map(|path| {
                tracing::debug!(path = %path.display(), "rendering post");
                self.render_post(&self.read_post(path)?)
            })
            .collect()
    }
}

/// The output file name for a post: the title lowercased with each space
/// replaced by a hyphen, plus `.html`. No other characters are touched, so
/// two titles differing only in case map to the same file.
pub fn post_path(title: &str) -> String {
    format!("{}.html", title.to_lowercase().replace(' ', "-"))
}

/// Formats a date as e.g. `March 5, 2021`.
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The `<head>` metadata for a post page. The `og:url` is derived from the
/// source file name (with `.md` swapped for `.html`), not from
/// [`post_path`]. The file name is appended to the base URL as a single
/// percent-encoded path segment.
pub fn create_head(post: &Post, site: &Site) -> Result<String> {
    let mut url = site.base_url.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidBaseUrl(site.base_url.clone()))?
        .pop_if_empty()
        .push(&post.source_filename.replacen(".md", ".html", 1));
    Ok(format!(
        r#"
    <title>{name} — {title}</title>
    <meta name="description"        content="{description}">
    <meta property="og:url"         content="{url}" />
    <meta property="og:type"        content="article" />
    <meta property="og:title"       content="{title}" />
    <meta property="og:description" content="{description}" />
    <meta property="og:image"       content="{cover}" />
    <meta name="twitter:card"       content="summary_large_image" />
    <meta name="twitter:image"      content="{cover}" />
  "#,
        name = site.name,
        title = post.title,
        description = post.description,
        url = url,
        cover = site.cover_image,
    ))
}

/// The visible page header: the title and its formatted date.
pub fn create_post_header(title: &str, date: &str) -> String {
    format!(
        r#"
    <header>
      <h1>{}</h1>
      <span class="date">{}</span>
    </header>
  "#,
        title, date
    )
}

/// The result of a post operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading or rendering a post.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a post source file can't be read.
    #[error("reading post `{}`: {err}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned when a post's front-matter is malformed or incomplete.
    #[error("parsing post `{}`: {err}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        err: frontmatter::Error,
    },

    /// Returned when a post's body can't be rendered.
    #[error("rendering post `{source_filename}`: {err}")]
    Markdown {
        source_filename: String,
        #[source]
        err: markdown::Error,
    },

    /// Returned when a post's file name isn't valid UTF-8.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// Returned when the site base URL can't have path segments appended
    /// (e.g. `mailto:` URLs).
    #[error("site base URL `{0}` cannot be a base")]
    InvalidBaseUrl(url::Url),
}
