use std::path::Path;

use csv::{ReaderBuilder, Writer};
use log::debug;

use crate::error::{Error, ParseError};

pub const DEPARTMENT_COLUMN: &str = "Department";

/// Rows of a class listing, stored positionally against `columns`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CourseTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or cutting it to the width of the table.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|row| row[index].as_str())
    }

    /// Reads a downloaded listing and makes sure every row names its department.
    ///
    /// The department is the part of the file name before the first `_`,
    /// upper-cased, so `csci_classes.csv` tags rows with `CSCI`.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let csv_error = |source| ParseError::Csv {
            path: path.to_owned(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        let headers = reader.headers().map_err(csv_error)?;
        let mut table = Self::new(
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| match i {
                    0 => header.trim_start_matches('\u{feff}'),
                    _ => header,
                }),
        );

        for record in reader.records() {
            table.push_row(&record.map_err(csv_error)?);
        }

        if table.is_empty() {
            return Err(ParseError::Empty {
                path: path.to_owned(),
            });
        }

        table.tag_department(&department_from_path(path));
        debug!("loaded {} rows from {}", table.len(), path.display());

        Ok(table)
    }

    fn tag_department(&mut self, code: &str) {
        let index = match self.column_index(DEPARTMENT_COLUMN) {
            Some(index) => index,
            None => {
                self.columns.push(DEPARTMENT_COLUMN.to_owned());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.columns.len() - 1
            }
        };

        for row in &mut self.rows {
            if row[index].trim().is_empty() {
                row[index] = code.to_owned();
            }
        }
    }

    /// Stacks tables in order. Columns are the union of all inputs in
    /// first-seen order; cells a table has no column for stay empty.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = CourseTable>,
    {
        let mut combined = Self::default();

        for table in tables {
            let positions: Vec<usize> = table
                .columns
                .iter()
                .map(|column| match combined.column_index(column) {
                    Some(index) => index,
                    None => {
                        combined.columns.push(column.clone());
                        combined.columns.len() - 1
                    }
                })
                .collect();

            for row in table.rows {
                let mut merged = vec![String::new(); combined.columns.len()];
                for (cell, &position) in row.into_iter().zip(&positions) {
                    merged[position] = cell;
                }
                combined.rows.push(merged);
            }
        }

        let width = combined.columns.len();
        for row in &mut combined.rows {
            row.resize(width, String::new());
        }

        combined
    }

    /// Writes the table as comma-separated text with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<(), Error> {
        let csv_error = |source| Error::Csv {
            path: path.to_owned(),
            source,
        };

        let mut writer = Writer::from_path(path).map_err(csv_error)?;
        writer.write_record(&self.columns).map_err(csv_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_error)?;
        }

        writer.flush().map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    }
}

fn department_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split('_').next())
        .unwrap_or_default()
        .to_uppercase()
}
