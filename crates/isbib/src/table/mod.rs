//! An in-memory table of named columns and the files it is read from and written to.
//!
//! Spreadsheets and CSV files are never appended to in place, appending means reading the
//! whole file, [`Table::append`]ing in memory and writing the whole file again.

use std::path::{Path, PathBuf};

use log::{info, trace};

use crate::{Error, ErrorKind};

mod delimited;
mod spreadsheet;

/// Rows of string cells under a header row.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A single row of a [`Table`], cells are addressed by column name.
#[derive(Clone, Copy, Debug)]
pub struct Row<'t> {
    headers: &'t [String],
    cells: &'t [String],
}

impl Table {
    /// Creates an empty table with the given headers.
    #[must_use]
    pub const fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// The column names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The number of rows, excluding the header row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            headers: &self.headers,
            cells,
        })
    }

    /// Position of the column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Adds a row, padding or truncating it to the number of headers.
    pub fn push(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    /// The raw identifiers of the `column` column in row order.
    ///
    /// Cells are trimmed and blank cells are skipped as they hold no identifier.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Table`] error is returned when the table has no column called `column`.
    pub fn isbns(&self, column: &str) -> Result<Vec<String>, Error> {
        let index = self.column(column).ok_or_else(|| {
            Error::new(
                ErrorKind::Table,
                format!(
                    "Column '{column}' not found, available columns are: {}",
                    self.headers.join(", ")
                ),
            )
        })?;

        Ok(self
            .rows
            .iter()
            .map(|row| row[index].trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Appends the rows of `other` after the existing rows.
    ///
    /// Columns of `other` that this table does not have are added after the existing columns,
    /// the existing rows get blank cells for them. Existing rows are otherwise left untouched.
    pub fn append(&mut self, other: Self) {
        let Self { headers, rows } = other;

        for header in &headers {
            if self.column(header).is_none() {
                self.headers.push(header.clone());
            }
        }

        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }

        // position of every column of `other` in this table
        let positions: Vec<usize> = headers
            .iter()
            .filter_map(|header| self.column(header))
            .collect();

        for row in rows {
            let mut cells = vec![String::new(); width];
            for (position, cell) in positions.iter().zip(row) {
                cells[*position] = cell;
            }
            self.rows.push(cells);
        }
    }
}

impl<'t> Row<'t> {
    /// The cell in the column called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'t str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.cells[i].as_str())
    }

    /// The cells in column order.
    #[must_use]
    pub const fn cells(&self) -> &'t [String] {
        self.cells
    }
}

/// The file formats a [`TableFile`] understands, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Comma separated values, read and written.
    Csv,
    /// Office Open XML workbook, read and written.
    Xlsx,
    /// Legacy Excel workbook, read only.
    Xls,
    /// Macro enabled workbook, read only.
    Xlsm,
    /// OpenDocument spreadsheet, read only.
    Ods,
}

impl Kind {
    /// The kind of table stored at `path` according to its extension.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Table`] error is returned for an unknown or missing extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "xlsm" => Ok(Self::Xlsm),
            "ods" => Ok(Self::Ods),
            _ => Err(Error::new(
                ErrorKind::Table,
                format!(
                    "'{}' is not a supported table file - expected a .csv, .xlsx, .xls, .xlsm or .ods file",
                    path.display()
                ),
            )),
        }
    }

    /// Whether tables can be written in this format.
    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(self, Self::Csv | Self::Xlsx)
    }

    /// The display name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel workbook",
            Self::Xls => "legacy Excel workbook",
            Self::Xlsm => "macro enabled Excel workbook",
            Self::Ods => "OpenDocument spreadsheet",
        }
    }
}

/// A trait for objects which are [`Table`] sources.
pub trait Reader {
    /// Reads the whole table.
    ///
    /// # Errors
    ///
    /// If this method encounters any form of error making it unable to produce the table.
    fn read(&mut self) -> Result<Table, Error>;
}

/// A trait for objects which are [`Table`] sinks.
pub trait Writer {
    /// Writes the whole table, replacing anything written before.
    ///
    /// # Errors
    ///
    /// The call to write should only return an [`Err`] when writing cannot be completed.
    fn write(&mut self, table: &Table) -> Result<(), Error>;
}

/// A table stored in a file, the format is decided by the file extension.
#[derive(Clone, Debug)]
pub struct TableFile {
    path: PathBuf,
    kind: Kind,
    sheet: Option<String>,
}

impl TableFile {
    /// A table file at `path`.
    ///
    /// For spreadsheets `sheet` names the sheet to read and write, the first sheet is read when
    /// it is [`None`]. CSV files ignore it.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Table`] error is returned when the extension is not supported.
    pub fn new<P: Into<PathBuf>>(path: P, sheet: Option<&str>) -> Result<Self, Error> {
        let path = path.into();
        let kind = Kind::from_path(&path)?;
        Ok(Self {
            path,
            kind,
            sheet: sheet.map(str::to_owned),
        })
    }

    /// The path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format of the file.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether the file exists yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the existing table or, when the file does not exist yet, an empty one.
    ///
    /// # Errors
    ///
    /// See [`Reader::read`].
    pub fn read_or_empty(&mut self) -> Result<Table, Error> {
        if self.exists() {
            self.read()
        } else {
            trace!("'{}' does not exist yet", self.path.display());
            Ok(Table::default())
        }
    }

    /// Appends `table` to the rows already in the file by rewriting the whole file.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] when the existing file cannot be read or the result cannot be written.
    pub fn append(&mut self, table: Table) -> Result<Table, Error> {
        let mut existing = self.read_or_empty()?;
        existing.append(table);
        self.write(&existing)?;
        Ok(existing)
    }
}

impl Reader for TableFile {
    fn read(&mut self) -> Result<Table, Error> {
        trace!("Reading {} file '{}'", self.kind.name(), self.path.display());
        let table = match self.kind {
            Kind::Csv => delimited::read(&self.path),
            _ => spreadsheet::read(&self.path, self.sheet.as_deref()),
        }?;
        info!(
            "Read {} row(s) from '{}'",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }
}

impl Writer for TableFile {
    fn write(&mut self, table: &Table) -> Result<(), Error> {
        match self.kind {
            Kind::Csv => delimited::write(&self.path, table),
            Kind::Xlsx => {
                spreadsheet::write(&self.path, self.sheet.as_deref().unwrap_or("Sheet1"), table)
            }
            kind => Err(Error::new(
                ErrorKind::Table,
                format!(
                    "Cannot write '{}' - {} files can only be read",
                    self.path.display(),
                    kind.name()
                ),
            )),
        }?;
        info!(
            "Wrote {} row(s) to '{}'",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}
