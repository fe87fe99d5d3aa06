use anyhow::Result;
use clap::Parser;
use folio::build::build_site;
use folio::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Rebuilds a static site from markdown posts and HTML templates.
#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
struct Cli {
    /// The site directory, holding `templates/`, `posts/`, `styles/`, and
    /// `imgs/`. The site is written to `build/` inside it.
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "folio=debug" } else { "folio=info" })
    });
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = Config::from_root(&cli.root)?;
    let summary = build_site(&config)?;
    tracing::info!(
        posts = summary.posts,
        styles = summary.styles,
        images = summary.images,
        output = %config.paths.output.display(),
        "build complete"
    );
    Ok(())
}
