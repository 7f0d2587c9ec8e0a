use std::path::PathBuf;

use anyhow::{Context, Result};

use class_scraper::config::{COMBINED_CSV, SIMPLIFIED_CSV};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let input = args.next().map_or_else(|| PathBuf::from(COMBINED_CSV), PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from(SIMPLIFIED_CSV), PathBuf::from);

    class_scraper::project(&input, &output)
        .with_context(|| format!("could not extract courses from {}", input.display()))?;

    Ok(())
}
