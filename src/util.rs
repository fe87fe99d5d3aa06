use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files directly inside `dir`, sorted by file name so that
/// builds don't depend on the order the file system happens to return.
/// Subdirectories are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = result?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
        }
    }
    Ok(files)
}
