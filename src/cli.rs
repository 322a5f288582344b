//! Command line utilities.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
pub use clap::Parser;
use clap::Args;
use log::info;

use crate::{config::is_valid_locale, Config};

/// Command line usage description.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Locale to mangle (e.g. "en", "es", "vi")
    pub locale: String,

    /// Command line options.
    #[command(flatten)]
    pub opts: Opts,
}

/// Command line options.
#[derive(Debug, Args, Clone, Default)]
pub struct Opts {
    /// Configuration file [default: "mangler.config.toml"]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing one output directory per locale [default: "dist"]
    #[arg(long)]
    pub dist_dir: Option<PathBuf>,

    /// Selector catalog file [default: ".mangled-selectors.json"]
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Locale from which the selector catalog is built [default: "en"]
    #[arg(long)]
    pub reference_locale: Option<String>,
}

/// Run the mangler for the locale given on the command line.
pub fn mangle(cli: &Cli) -> Result<()> {
    if !is_valid_locale(&cli.locale) {
        return Err(anyhow!("invalid locale {:?}", cli.locale));
    }

    let config = Config::from_opts(&cli.opts).context("loading configuration")?;

    info!("Mangling selectors for locale {:?}...", cli.locale);

    let start_time = std::time::Instant::now();

    let summary = crate::mangle(&config, &cli.locale)
        .with_context(|| format!("mangling selectors for locale {:?}", cli.locale))?;

    if summary.reference {
        info!(
            "Scanned {} files, cataloged {} new selectors ({} total)",
            summary.scanned_files, summary.added_selectors, summary.catalog_size
        );
    }

    info!(
        "Mangled {} files with {} selectors in {:.2} seconds",
        summary.rewritten_files,
        summary.catalog_size,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
