use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{error, info, warn};
use reqwest::Client;
use url::Url;

pub mod config;
pub mod department;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod project;
pub mod spreadsheet;
pub mod table;

pub use config::ScrapeConfig;
pub use department::Department;
pub use error::{DepartmentError, Error, FetchError, ParseError, Result};
pub use project::{project, CourseSummary, SUMMARY_FIELDS};
pub use table::{CourseTable, DEPARTMENT_COLUMN};

/// How far a department got before it was accumulated or skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Pending,
    PageFetched,
    LinkResolved,
    FileRetrieved,
    TableLoaded,
}

#[derive(Debug)]
pub enum Outcome {
    Accumulated { rows: usize },
    Skipped { stage: Stage, reason: DepartmentError },
}

impl Outcome {
    pub fn is_accumulated(&self) -> bool {
        matches!(self, Self::Accumulated { .. })
    }
}

#[derive(Debug)]
pub struct Combined {
    pub table: CourseTable,
    pub csv: PathBuf,
    /// Set only when the spreadsheet mirror was written.
    pub xlsx: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub outcomes: Vec<(Department, Outcome)>,
    /// `None` when no department yielded data; nothing was written then.
    pub combined: Option<Combined>,
}

impl RunReport {
    pub fn accumulated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_accumulated())
            .count()
    }
}

/// A scraping run against one term of the class-search site.
///
/// Owns the http client, so every request of the run goes out with the same
/// headers and cookie jar.
pub struct ClassSearch {
    client: Client,
    config: ScrapeConfig,
}

impl ClassSearch {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = fetch::client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Downloads one department's listing to its file in the download
    /// directory and loads it.
    async fn department_table(
        &self,
        department: Department,
        page: Url,
    ) -> Result<CourseTable, (Stage, DepartmentError)> {
        info!("processing department {} ({})", department, page);

        let html = fetch::fetch_page(&self.client, &page)
            .await
            .map_err(|e| (Stage::Pending, DepartmentError::Fetch(e)))?;

        let link = parse::resolve(&html, &page)
            .ok_or_else(|| (Stage::PageFetched, DepartmentError::NoLinkFound { page }))?;
        info!("downloading from {}", link);

        let dest = self.config.download_path(department);
        let path = fetch::retrieve(&self.client, &link, &dest)
            .await
            .map_err(|e| (Stage::LinkResolved, DepartmentError::Fetch(e)))?;
        info!("downloaded csv to {}", path.display());

        let table = CourseTable::load(&path).map_err(|e| {
            let stage = match e {
                ParseError::Empty { .. } => Stage::TableLoaded,
                ParseError::Csv { .. } => Stage::FileRetrieved,
            };
            (stage, DepartmentError::Parse(e))
        })?;
        info!("processed {} classes from {}", table.len(), path.display());

        Ok(table)
    }

    /// Walks every configured department in order, one request at a time,
    /// and writes the combined table if anything was collected.
    pub async fn scrape(&self) -> Result<RunReport> {
        let started_at = Local::now();

        let dir = &self.config.download_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })?;

        let mut tables = Vec::new();
        let mut outcomes = Vec::with_capacity(self.config.departments.len());

        for (i, &department) in self.config.departments.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.delay).await;
            }

            let page = self.config.listing_url(department)?;
            let outcome = match self.department_table(department, page).await {
                Ok(table) => {
                    let rows = table.len();
                    tables.push(table);
                    Outcome::Accumulated { rows }
                }
                Err((stage, reason)) => {
                    warn!("skipping {} after {:?}: {}", department, stage, reason);
                    Outcome::Skipped { stage, reason }
                }
            };
            outcomes.push((department, outcome));
        }

        let combined = if tables.is_empty() {
            error!("no data was collected");
            None
        } else {
            Some(self.write_combined(tables)?)
        };

        Ok(RunReport {
            started_at,
            finished_at: Local::now(),
            outcomes,
            combined,
        })
    }

    fn write_combined(&self, tables: Vec<CourseTable>) -> Result<Combined> {
        let table = CourseTable::concat(tables);
        let csv = self.config.combined_csv.clone();
        table.write_csv(&csv)?;
        info!("saved {} classes to {}", table.len(), csv.display());

        let xlsx = if spreadsheet::is_available() {
            let path = self.config.combined_xlsx.clone();
            match spreadsheet::write(&table, &path) {
                Ok(()) => {
                    info!("also saved to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        } else {
            info!("built without the `xlsx` feature, spreadsheet not created");
            None
        };

        Ok(Combined { table, csv, xlsx })
    }
}
