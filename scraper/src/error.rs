use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// A request that did not end in a `200 OK` body, or a body that could not be saved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} answered with status {status}")]
    Status { url: Url, status: StatusCode },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{} is not valid tabular text: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no data rows", path.display())]
    Empty { path: PathBuf },
}

/// Why a single department was skipped. Never escapes the aggregator.
#[derive(Debug, Error)]
pub enum DepartmentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no csv link on {page}")]
    NoLinkFound { page: Url },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not write spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("required field {0:?} is missing from the table")]
    MissingRequiredField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
