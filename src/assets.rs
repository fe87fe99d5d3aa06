use crate::util::list_files;
use std::io;
use std::path::{Path, PathBuf};

/// Copies every regular file directly inside `source_directory` into
/// `output_directory`, byte for byte, keeping its file name. Returns the
/// number of files copied. Subdirectories are not descended into.
pub fn copy_assets(source_directory: &Path, output_directory: &Path) -> Result<usize> {
    let files = list_files(source_directory)?;
    for src in &files {
        // list_files only yields entries with a file name
        let dst = match src.file_name() {
            Some(name) => output_directory.join(name),
            None => continue,
        };
        tracing::debug!(from = %src.display(), to = %dst.display(), "copying asset");
        std::fs::copy(src, &dst).map_err(|err| Error::Copy {
            path: src.to_owned(),
            err,
        })?;
    }
    Ok(files.len())
}

/// The result of an asset-copying operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error copying assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the source directory can't be listed.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Returned when a single file can't be copied.
    #[error("copying `{}`: {err}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}
