use std::io;
use std::path::{Path, PathBuf};

/// A finished output file: its path relative to the output directory and
/// its full HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: String,
    pub html: String,
}

/// Writes each page to `{output_directory}/{page.path}`, one file at a time.
/// A failure part-way leaves the earlier pages on disk.
pub fn write_pages(output_directory: &Path, pages: &[RenderedPage]) -> Result<()> {
    for page in pages {
        let path = output_directory.join(&page.path);
        tracing::debug!(path = %path.display(), "writing page");
        std::fs::write(&path, &page.html).map_err(|err| Error { path, err })?;
    }
    Ok(())
}

/// The result of a page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Returned when an output file can't be written.
#[derive(Debug, thiserror::Error)]
#[error("writing `{}`: {err}", .path.display())]
pub struct Error {
    pub path: PathBuf,

    #[source]
    pub err: io::Error,
}
