use std::{collections::HashSet, path::PathBuf, time::Duration};

use url::Url;

use crate::{department::Department, error::Error};

pub const DEFAULT_TERM: &str = "20253";
pub const DOWNLOAD_DIR: &str = "usc_class_data";
pub const COMBINED_CSV: &str = "usc_all_classes.csv";
pub const COMBINED_XLSX: &str = "usc_all_classes.xlsx";
pub const SIMPLIFIED_CSV: &str = "usc_all_courses_simplified.csv";
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything a scraping run needs to know up front.
#[derive(Clone, Debug)]
pub struct ScrapeConfig {
    /// Term root, e.g. `https://classes.usc.edu/term-20253/`.
    pub base_url: Url,
    pub departments: Vec<Department>,
    pub delay: Duration,
    /// Upper bound on one request, body included.
    pub timeout: Duration,
    pub download_dir: PathBuf,
    pub combined_csv: PathBuf,
    pub combined_xlsx: PathBuf,
    pub user_agent: String,
}

impl ScrapeConfig {
    pub fn for_term(term: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://classes.usc.edu/term-{}/", term))?;
        Ok(Self::with_base_url(base_url))
    }

    /// Defaults for every setting except where the term lives.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            departments: Department::all().collect(),
            delay: REQUEST_DELAY,
            timeout: REQUEST_TIMEOUT,
            download_dir: DOWNLOAD_DIR.into(),
            combined_csv: COMBINED_CSV.into(),
            combined_xlsx: COMBINED_XLSX.into(),
            user_agent: USER_AGENT.to_owned(),
        }
    }

    /// Restricts the run to `departments`, dropping repeats.
    pub fn departments(mut self, departments: impl IntoIterator<Item = Department>) -> Self {
        let mut seen = HashSet::new();
        self.departments = departments
            .into_iter()
            .filter(|department| seen.insert(*department))
            .collect();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Puts the download directory and both combined outputs under `root`.
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.download_dir = root.join(DOWNLOAD_DIR);
        self.combined_csv = root.join(COMBINED_CSV);
        self.combined_xlsx = root.join(COMBINED_XLSX);
        self
    }

    /// `<base>/classes/<code>`
    pub fn listing_url(&self, department: Department) -> Result<Url, Error> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("classes/{}", department))?)
    }

    pub fn download_path(&self, department: Department) -> PathBuf {
        self.download_dir.join(department.file_name())
    }
}
