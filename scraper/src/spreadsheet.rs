//! Optional `.xlsx` mirror of the combined table.
//!
//! Only built with the `xlsx` feature; callers ask [`is_available`] first.

use std::path::Path;

use crate::{error::Error, table::CourseTable};

/// Whether this build can write spreadsheets.
pub const fn is_available() -> bool {
    cfg!(feature = "xlsx")
}

#[cfg(feature = "xlsx")]
pub fn write(table: &CourseTable, path: &Path) -> Result<(), Error> {
    use rust_xlsxwriter::Workbook;

    let spreadsheet_error = |source: Box<dyn std::error::Error + Send + Sync>| Error::Spreadsheet {
        path: path.to_owned(),
        source,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header = std::iter::once(table.columns());
    for (row, cells) in header.chain(table.rows()).enumerate() {
        let row = u32::try_from(row).map_err(|e| spreadsheet_error(e.into()))?;
        for (column, cell) in cells.iter().enumerate() {
            let column = u16::try_from(column).map_err(|e| spreadsheet_error(e.into()))?;
            worksheet
                .write_string(row, column, cell.as_str())
                .map_err(|e| spreadsheet_error(e.into()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| spreadsheet_error(e.into()))
}

#[cfg(not(feature = "xlsx"))]
pub fn write(_table: &CourseTable, path: &Path) -> Result<(), Error> {
    Err(Error::Spreadsheet {
        path: path.to_owned(),
        source: "built without the `xlsx` feature".into(),
    })
}
