//! Build configuration: where the sources and output live ([`Paths`]) and the
//! site-wide values that go into every page head ([`Site`]).

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the optional site settings file in the root directory.
pub const SITE_FILE: &str = "site.yaml";

/// The base paths for a build. Every directory is derived from a single root,
/// which is passed in explicitly rather than inferred from the location of
/// the running program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,

    /// Holds `index.html` and `post.html`.
    pub templates: PathBuf,

    /// Holds the post source files; every regular file in it is a post.
    pub posts: PathBuf,

    /// Stylesheets, copied verbatim.
    pub styles: PathBuf,

    /// Images, copied verbatim.
    pub images: PathBuf,

    /// Destroyed and recreated on every build.
    pub output: PathBuf,
}

impl Paths {
    pub fn from_root(root: &Path) -> Paths {
        Paths {
            root: root.to_owned(),
            templates: root.join("templates"),
            posts: root.join("posts"),
            styles: root.join("styles"),
            images: root.join("imgs"),
            output: root.join("build"),
        }
    }

    pub fn index_template(&self) -> PathBuf {
        self.templates.join("index.html")
    }

    pub fn post_template(&self) -> PathBuf {
        self.templates.join("post.html")
    }

    /// The directories a build reads from.
    pub fn sources(&self) -> [&Path; 4] {
        [&self.templates, &self.posts, &self.styles, &self.images]
    }
}

/// Site settings, read from `site.yaml`. Every key is optional.
///
/// ```yaml
/// name: neosiae
/// base_url: https://neosiae.com/
/// cover_image: cover.jpg
/// ```
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Site {
    /// Prefixes every page `<title>`.
    pub name: String,

    /// The public URL of the output directory. Post `og:url`s append the
    /// source file name to its path.
    pub base_url: Url,

    /// The `og:image`/`twitter:image` for every post.
    pub cover_image: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            name: String::from("neosiae"),
            base_url: Url::parse("https://neosiae.com/").expect("static URL is valid"),
            cover_image: String::from("cover.jpg"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub paths: Paths,
    pub site: Site,
}

impl Config {
    /// Builds a [`Config`] for the site rooted at `root`, loading
    /// `{root}/site.yaml` if it exists and falling back to [`Site::default`]
    /// otherwise.
    pub fn from_root(root: &Path) -> Result<Config> {
        let site_file = root.join(SITE_FILE);
        let site = if site_file.is_file() {
            match Site::from_file(&site_file) {
                Ok(site) => site,
                Err(e) => return Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            tracing::debug!(path = %site_file.display(), "no site file, using defaults");
            Site::default()
        };

        Ok(Config {
            paths: Paths::from_root(root),
            site,
        })
    }
}

impl Site {
    pub fn from_file(path: &Path) -> Result<Site> {
        let file = match File::open(path) {
            Err(e) => return Err(anyhow!("Opening site file `{}`: {}", path.display(), e)),
            Ok(file) => file,
        };
        Ok(serde_yaml::from_reader(file)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paths_from_root() {
        let paths = Paths::from_root(Path::new("/site"));
        assert_eq!(PathBuf::from("/site/templates/index.html"), paths.index_template());
        assert_eq!(PathBuf::from("/site/templates/post.html"), paths.post_template());
        assert_eq!(PathBuf::from("/site/imgs"), paths.images);
        assert_eq!(PathBuf::from("/site/build"), paths.output);
    }

    #[test]
    fn test_site_partial_yaml() -> Result<()> {
        let site: Site = serde_yaml::from_str("name: example")?;
        assert_eq!("example", site.name);
        assert_eq!(Site::default().base_url, site.base_url);
        Ok(())
    }

    #[test]
    fn test_site_rejects_unknown_keys() {
        assert!(serde_yaml::from_str::<Site>("nmae: typo").is_err());
    }

    #[test]
    fn test_config_with_malformed_site_file() -> Result<()> {
        let root = tempfile::tempdir()?;
        std::fs::write(root.path().join(SITE_FILE), "base_url: [not, a, url]\n")?;
        assert!(Config::from_root(root.path()).is_err());

        std::fs::write(root.path().join(SITE_FILE), "base_url: not a url\n")?;
        let err = Config::from_root(root.path()).unwrap_err();
        assert!(err.to_string().starts_with("Loading configuration"), "{}", err);
        Ok(())
    }

    #[test]
    fn test_config_without_site_file() -> Result<()> {
        let config = Config::from_root(Path::new("./does-not-exist"))?;
        assert_eq!(Site::default(), config.site);
        Ok(())
    }
}
