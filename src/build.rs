//! Exports the [`build_site`] function which stitches together the steps of
//! building the output site, in a fixed order: recreate the output directory,
//! build the index ([`crate::index`]), build the posts ([`crate::post`]), then
//! copy styles and images ([`crate::assets`]). Any failure stops the build
//! where it is; nothing is rolled back.

use crate::assets::{copy_assets, Error as AssetsError};
use crate::config::{Config, Paths};
use crate::frontmatter::YamlFrontmatter;
use crate::highlight::SyntectHighlighter;
use crate::index::{build_index, Error as IndexError};
use crate::markdown::CmarkRenderer;
use crate::page::{write_pages, Error as WriteError, RenderedPage};
use crate::post::{Error as PostError, Pipeline};
use crate::util::list_files;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// What a build produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub posts: usize,
    pub styles: usize,
    pub images: usize,
}

/// Builds the site described by `config`.
pub fn build_site(config: &Config) -> Result<Summary> {
    let paths = &config.paths;
    let parser = YamlFrontmatter;

    recreate_output_directory(paths)?;

    let post_files = list_files(&paths.posts).map_err(|err| Error::ListPosts {
        path: paths.posts.clone(),
        err,
    })?;

    tracing::info!("building index");
    let index_template = read_template(&paths.index_template())?;
    let index = build_index(&index_template, &post_files, &parser)?;
    write_pages(&paths.output, std::slice::from_ref(&index))?;

    tracing::info!(count = post_files.len(), "building posts");
    let post_template = read_template(&paths.post_template())?;
    let highlighter = SyntectHighlighter::new();
    let pipeline = Pipeline {
        template: &post_template,
        site: &config.site,
        parser: &parser,
        renderer: &CmarkRenderer::new(),
        highlighter: &highlighter,
    };
    let posts = pipeline.render_posts(&post_files)?;
    warn_collisions(&index, &posts);
    write_pages(&paths.output, &posts)?;

    tracing::info!("copying styles");
    let styles = copy_assets(&paths.styles, &paths.output).map_err(Error::Styles)?;

    tracing::info!("copying images");
    let images = copy_assets(&paths.images, &paths.output).map_err(Error::Images)?;

    Ok(Summary {
        posts: posts.len(),
        styles,
        images,
    })
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
        path: path.to_owned(),
        err,
    })
}

// Output paths are derived from titles, so two posts can land on the same
// file (or on `index.html`). The later write wins.
fn warn_collisions(index: &RenderedPage, posts: &[RenderedPage]) {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(index.path.as_str());
    for post in posts {
        if !seen.insert(post.path.as_str()) {
            tracing::warn!(path = %post.path, "output path written more than once");
        }
    }
}

/// Removes the output directory (if it exists) and creates it empty. Refuses
/// to touch a directory that is, or contains, the site root or any source
/// directory.
fn recreate_output_directory(paths: &Paths) -> Result<()> {
    check_output_directory(paths)?;
    let dir = &paths.output;
    match std::fs::remove_dir_all(dir) {
        Ok(()) => tracing::info!(path = %dir.display(), "removed output directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(Error::Clean {
                path: dir.to_owned(),
                err,
            })
        }
    }
    std::fs::create_dir_all(dir).map_err(|err| Error::Clean {
        path: dir.to_owned(),
        err,
    })
}

fn check_output_directory(paths: &Paths) -> Result<()> {
    let output = normalize(&paths.output);
    let sources = paths.sources();
    let unsafe_output = |protected: &Path| Error::UnsafeOutputDirectory {
        output: paths.output.clone(),
        protected: protected.to_owned(),
    };

    // the output directory must not swallow the root or a source directory
    for path in std::iter::once(paths.root.as_path()).chain(sources.iter().copied()) {
        if normalize(path).starts_with(&output) {
            return Err(unsafe_output(path));
        }
    }
    // nor live inside a source directory
    for source in sources.iter() {
        if output.starts_with(normalize(source)) {
            return Err(unsafe_output(source));
        }
    }
    Ok(())
}

// Makes a path absolute and resolves symlinks in the part of it that exists,
// so that `./build`, `build`, and a symlinked root all compare equal even
// before the output directory has been created.
fn normalize(path: &Path) -> PathBuf {
    let absolute = match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_owned(),
    };
    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut canonical) = existing.canonicalize() {
            canonical.extend(missing.iter().rev());
            return canonical;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return lexical.clone(),
        }
    }
}

/// The result of a build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Each variant names the phase it came
/// from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the output directory overlaps the site root or a source
    /// directory. Nothing has been deleted when this is returned.
    #[error(
        "refusing to recreate output directory `{}`: it overlaps `{}`",
        .output.display(),
        .protected.display()
    )]
    UnsafeOutputDirectory { output: PathBuf, protected: PathBuf },

    /// Returned for I/O problems while removing or creating the output
    /// directory.
    #[error("cleaning directory `{}`: {err}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when the posts directory can't be listed.
    #[error("listing posts in `{}`: {err}", .path.display())]
    ListPosts {
        path: PathBuf,
        #[source]
        err: walkdir::Error,
    },

    /// Returned for I/O problems while reading template files.
    #[error("opening template file `{}`: {err}", .path.display())]
    OpenTemplateFile {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned for errors building the index.
    #[error("building index: {0}")]
    Index(#[from] IndexError),

    /// Returned for errors building posts.
    #[error("building posts: {0}")]
    Post(#[from] PostError),

    /// Returned when a page can't be written.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Returned for errors copying stylesheets.
    #[error("copying styles: {0}")]
    Styles(#[source] AssetsError),

    /// Returned for errors copying images.
    #[error("copying images: {0}")]
    Images(#[source] AssetsError),
}

#[cfg(test)]
mod test {
    use super::*;

    fn paths_with_output(root: &Path, output: PathBuf) -> Paths {
        Paths {
            output,
            ..Paths::from_root(root)
        }
    }

    #[test]
    fn test_default_output_is_safe() -> std::io::Result<()> {
        let root = tempfile::tempdir()?;
        assert!(check_output_directory(&Paths::from_root(root.path())).is_ok());
        Ok(())
    }

    #[test]
    fn test_refuses_root_as_output() -> std::io::Result<()> {
        let root = tempfile::tempdir()?;
        let paths = paths_with_output(root.path(), root.path().to_owned());
        assert!(matches!(
            check_output_directory(&paths),
            Err(Error::UnsafeOutputDirectory { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_refuses_ancestor_of_root() -> std::io::Result<()> {
        let root = tempfile::tempdir()?;
        let site = root.path().join("site");
        std::fs::create_dir(&site)?;
        let paths = paths_with_output(&site, root.path().join("site/.."));
        assert!(check_output_directory(&paths).is_err());
        Ok(())
    }

    #[test]
    fn test_refuses_source_directory() -> std::io::Result<()> {
        let root = tempfile::tempdir()?;
        let paths = paths_with_output(root.path(), root.path().join("posts"));
        assert!(check_output_directory(&paths).is_err());
        let paths = paths_with_output(root.path(), root.path().join("imgs/out"));
        assert!(check_output_directory(&paths).is_err());
        Ok(())
    }

    #[test]
    fn test_recreate_clears_existing_output() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let paths = Paths::from_root(root.path());
        std::fs::create_dir(&paths.output)?;
        std::fs::write(paths.output.join("stale.html"), "old")?;

        recreate_output_directory(&paths)?;
        assert!(paths.output.is_dir());
        assert!(!paths.output.join("stale.html").exists());
        Ok(())
    }
}
