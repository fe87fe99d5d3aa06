//! The library code for the `folio` static site generator. A build is one
//! synchronous pass over a site directory:
//!
//! 1. Recreate the output directory ([`crate::build`])
//! 2. Render `index.html` from every post's front-matter ([`crate::index`])
//! 3. Render one page per post ([`crate::post`])
//! 4. Copy stylesheets and images verbatim ([`crate::assets`])
//!
//! Pages are assembled by literal placeholder substitution
//! ([`crate::template`]): a template marks a slot with `{name}` and the build
//! fills it with a finished HTML fragment. Front-matter parsing
//! ([`crate::frontmatter`]), markdown rendering ([`crate::markdown`]), and code
//! highlighting ([`crate::highlight`]) each sit behind a one-method trait.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod config;
pub mod frontmatter;
pub mod highlight;
pub mod index;
pub mod markdown;
pub mod page;
pub mod post;
pub mod template;
mod util;
