//! Builds `index.html`: a date-ordered list of links to every post.

use crate::frontmatter::{self, FrontmatterParser};
use crate::page::RenderedPage;
use crate::post::{format_date, post_path};
use crate::template::{replace_template_variable, Replacement};
use chrono::NaiveDateTime;
use std::io;
use std::path::{Path, PathBuf};

/// The slice of a post the index needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub title: String,
    pub date: NaiveDateTime,
}

/// Reads only the front-matter of a post. `description` isn't required here.
pub fn read_index_entry(path: &Path, parser: &dyn FrontmatterParser) -> Result<IndexEntry> {
    let contents = std::fs::read_to_string(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    let annotate = |err| Error::Frontmatter {
        path: path.to_owned(),
        err,
    };
    let attributes = parser.parse(&contents).map_err(annotate)?.attributes;
    Ok(IndexEntry {
        title: attributes.title().map_err(annotate)?.to_owned(),
        date: attributes.date().map_err(annotate)?,
    })
}

/// Orders entries newest first. The sort is stable, so entries with equal
/// dates keep their relative order.
pub fn sort_posts(mut entries: Vec<IndexEntry>) -> Vec<IndexEntry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// Renders one `<div class="post">` per entry, joined by newlines.
pub fn map_posts_to_html(entries: &[IndexEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                r#"
      <div class="post">
        <a href="{}">
          <h1>{}</h1>
        </a>
        <span class="date">{}</span>
      </div>
    "#,
                post_path(&entry.title),
                entry.title,
                format_date(&entry.date),
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Sorts the entries and fills the template's `{posts}` placeholder.
pub fn render_index(template: &str, entries: Vec<IndexEntry>) -> RenderedPage {
    let entries = sort_posts(entries);
    RenderedPage {
        path: String::from("index.html"),
        html: replace_template_variable(
            template,
            &Replacement::new("posts", map_posts_to_html(&entries)),
        ),
    }
}

/// Reads every post in `paths` and renders the index page.
pub fn build_index(
    template: &str,
    paths: &[PathBuf],
    parser: &dyn FrontmatterParser,
) -> Result<RenderedPage> {
    let entries = paths
        .iter()
        .map(|path| read_index_entry(path, parser))
        .collect::<Result<Vec<IndexEntry>>>()?;
    tracing::debug!(posts = entries.len(), "indexed posts");
    Ok(render_index(template, entries))
}

/// The result of an index operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building the index.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a post source file can't be read.
    #[error("reading post `{}`: {err}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned when a post's `title` or `date` is missing or malformed.
    #[error("parsing post `{}`: {err}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        err: frontmatter::Error,
    },
}
