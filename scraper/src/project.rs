use std::path::Path;

use csv::{Reader, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The columns kept by [`project`], in output order.
pub const SUMMARY_FIELDS: [&str; 3] = ["Course number", "Course title", "Instructor"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(rename = "Course number")]
    pub course_number: String,
    #[serde(rename = "Course title")]
    pub course_title: String,
    #[serde(rename = "Instructor")]
    pub instructor: String,
}

/// Copies the course number, title and instructor of every row of `input`
/// into a new table at `output`, keeping row order. Returns the row count.
///
/// A combined table without one of those columns is unusable downstream, so
/// that aborts before anything is written.
pub fn project(input: &Path, output: &Path) -> Result<usize, Error> {
    let input_error = |source| Error::Csv {
        path: input.to_owned(),
        source,
    };
    let output_error = |source| Error::Csv {
        path: output.to_owned(),
        source,
    };

    let mut reader = Reader::from_path(input).map_err(input_error)?;
    let headers = reader.headers().map_err(input_error)?;
    for field in SUMMARY_FIELDS {
        if !headers.iter().any(|header| header == field) {
            return Err(Error::MissingRequiredField(field));
        }
    }

    // header written by hand so an input without rows still yields one
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(output)
        .map_err(output_error)?;
    writer.write_record(SUMMARY_FIELDS).map_err(output_error)?;

    let mut rows = 0;
    for summary in reader.deserialize::<CourseSummary>() {
        let summary = summary.map_err(input_error)?;
        writer.serialize(&summary).map_err(output_error)?;
        rows += 1;
    }

    writer.flush().map_err(|source| Error::Io {
        path: output.to_owned(),
        source,
    })?;

    info!("extracted {} courses to {}", rows, output.display());
    Ok(rows)
}
