use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use class_scraper::{config::DEFAULT_TERM, ClassSearch, ScrapeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let term = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_TERM.to_owned());
    let config = ScrapeConfig::for_term(&term).context("invalid term")?;

    let search = ClassSearch::new(config)?;
    let report = search.scrape().await?;

    let elapsed = report.finished_at - report.started_at;
    info!(
        "{} of {} departments yielded data in {}s",
        report.accumulated(),
        report.outcomes.len(),
        elapsed.num_seconds()
    );

    if let Some(combined) = report.combined {
        let table = combined.table;
        info!("total rows: {}", table.len());
        info!("columns: {}", table.columns().iter().join(", "));
        info!("sample of data (first 5 rows):");
        for row in table.rows().take(5) {
            info!("  {}", row.iter().join(" | "));
        }
    }

    Ok(())
}
