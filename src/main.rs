//! Mangle CSS selectors of a compiled locale.

use anyhow::Result;
use log::LevelFilter;
use mangler::cli::{Cli, Parser};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    mangler::cli::mangle(&cli)?;

    Ok(())
}
