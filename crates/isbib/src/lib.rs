#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! # isbib
//!
//! isbib builds bibliographies from lists of ISBNs. Every identifier is validated and
//! normalized locally, valid ones are looked up in a [`Catalog`] such as [`GoogleBooks`] and each
//! identifier becomes one [`Record`] of the bibliography, a failing identifier never aborts the
//! run.
//!
//! Identifiers are read from a column of a [`Table`] or line by line through [`scan`], the
//! bibliography is written back as a [`Table`] to a CSV or Excel [`TableFile`].

mod api;
pub mod catalog;
pub mod config;
mod error;
pub mod isbn;
pub mod pipeline;
pub mod record;
pub mod scan;
pub mod table;

pub use api::{GoogleBooks, SOURCES};
pub use catalog::{Catalog, Lookup, Volume};
pub use config::Config;
pub use error::{Error, ErrorKind};
pub use isbn::{normalize, Isbn, ValidationError};
pub use pipeline::{Pipeline, Progress, Summary};
pub use record::{Record, COLUMNS};
pub use table::{Reader, Table, TableFile, Writer};

use log::trace;

/// Creates the catalog selected by the `api_source_priority` of the [`Config`].
///
/// # Errors
///
/// An [`ErrorKind::Config`] error is returned when no listed source is supported or the options
/// of the selected source are invalid.
pub fn catalog(config: &Config) -> Result<Box<dyn Catalog>, Error> {
    let source = config.source()?;
    trace!("Using the '{source}' catalog");

    match source {
        api::google_books::NAME => Ok(Box::new(
            GoogleBooks::<reqwest::blocking::Client>::from_config(config)?,
        )),
        other => Err(Error::new(
            ErrorKind::Config,
            format!("Catalog source '{other}' is not supported"),
        )),
    }
}

/// Reads the raw identifiers of the `column` column of the table at `path`.
///
/// # Errors
///
/// An [`ErrorKind::Table`] error is returned when the file cannot be read or has no `column`.
pub fn read_isbns<P: Into<std::path::PathBuf>>(
    path: P,
    sheet: Option<&str>,
    column: &str,
) -> Result<Vec<String>, Error> {
    TableFile::new(path, sheet)?.read()?.isbns(column)
}

#[cfg(test)]
mod tests {
    use assert_fs::{fixture::FileWriteStr, NamedTempFile};

    use super::{catalog, read_isbns, Config, ErrorKind};

    #[test]
    fn default_config_selects_google_books() {
        let catalog = catalog(&Config::default()).unwrap();
        assert_eq!("google", catalog.name());
    }

    #[test]
    fn bad_endpoint_fails_catalog_creation() {
        let config = Config {
            google_books_url: "books.example.com".to_owned(),
            ..Config::default()
        };

        assert_eq!(ErrorKind::Config, catalog(&config).err().unwrap().kind());
    }

    #[test]
    fn isbns_are_read_from_named_column() {
        let file = NamedTempFile::new("books.csv").unwrap();
        file.write_str("Title,Barcode\nA,0306406152\nB,\nC, 978-0-439-02352-8\n")
            .unwrap();

        assert_eq!(
            vec!["0306406152".to_owned(), "978-0-439-02352-8".to_owned()],
            read_isbns(file.path(), None, "Barcode").unwrap()
        );
        assert_eq!(
            ErrorKind::Table,
            read_isbns(file.path(), None, "ISBN").unwrap_err().kind()
        );
    }
}
