use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader as _};
use rust_xlsxwriter::Workbook;

use crate::{Error, ErrorKind};

use super::Table;

/// Reads the sheet called `sheet` or the first sheet of a workbook.
pub(crate) fn read(path: &Path, sheet: Option<&str>) -> Result<Table, Error> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        Error::with_context(
            ErrorKind::Table,
            format!("Cannot open the spreadsheet '{}'", path.display()),
            e,
        )
    })?;

    let name = match sheet {
        Some(name) => name.to_owned(),
        None => workbook.sheet_names().first().cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::NoValue,
                format!("The spreadsheet '{}' has no sheets", path.display()),
            )
        })?,
    };

    let range = workbook.worksheet_range(&name).map_err(|e| {
        Error::with_context(
            ErrorKind::Table,
            format!("Cannot read the '{name}' sheet of '{}'", path.display()),
            e,
        )
    })?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let mut table = Table::new(headers);
    for row in rows {
        table.push(row.iter().map(cell_to_string).collect());
    }

    Ok(table)
}

/// Writes the table as the only sheet of a new workbook.
pub(crate) fn write(path: &Path, sheet: &str, table: &Table) -> Result<(), Error> {
    let to_error = |e: rust_xlsxwriter::XlsxError| {
        Error::with_context(
            ErrorKind::Table,
            format!("Cannot write the spreadsheet '{}'", path.display()),
            e,
        )
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).map_err(to_error)?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string(0, column(col)?, header.as_str())
            .map_err(to_error)?;
    }

    for (index, row) in table.rows().enumerate() {
        let row_num = u32::try_from(index + 1).map_err(|_| too_large(path))?;
        for (col, cell) in row.cells().iter().enumerate() {
            if !cell.is_empty() {
                worksheet
                    .write_string(row_num, column(col)?, cell.as_str())
                    .map_err(to_error)?;
            }
        }
    }

    workbook.save(path).map_err(to_error)
}

fn column(index: usize) -> Result<u16, Error> {
    u16::try_from(index)
        .map_err(|_| Error::new(ErrorKind::Table, "Too many columns for a spreadsheet"))
}

fn too_large(path: &Path) -> Error {
    Error::new(
        ErrorKind::Table,
        format!("Too many rows for the spreadsheet '{}'", path.display()),
    )
}

/// Renders a cell as text, whole numbers (ISBNs typed into a spreadsheet) without a decimal
/// part.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e16 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
