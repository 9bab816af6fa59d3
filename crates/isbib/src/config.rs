//! Run configuration, loaded once from an optional JSON document.

use std::{fs, path::Path, time::Duration};

use log::{info, warn};
use serde::Deserialize;

use crate::{
    api::{
        google_books::{parse_endpoint, GOOGLE_BOOKS_URL},
        SOURCES,
    },
    Error, ErrorKind,
};

/// Options of a run, every option has a default so any subset may be configured.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Name of the input table column holding the ISBNs.
    pub isbn_column_name: String,
    /// Name of the sheet written to spreadsheet outputs.
    pub output_sheet_name: String,
    /// Seconds to wait between two catalog requests.
    pub rate_limit_delay: f64,
    /// Optional Google Books API key to raise the quota.
    pub google_books_api_key: Option<String>,
    /// Catalog sources in order of preference, the first implemented one is used.
    pub api_source_priority: Vec<String>,
    /// Endpoint of the Google Books volumes API.
    pub google_books_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            isbn_column_name: "ISBN".to_owned(),
            output_sheet_name: "Bibliography".to_owned(),
            rate_limit_delay: 1.0,
            google_books_api_key: None,
            api_source_priority: vec!["google".to_owned()],
            google_books_url: GOOGLE_BOOKS_URL.to_owned(),
        }
    }
}

impl Config {
    /// Loads the configuration document at `path`.
    ///
    /// Options missing from the document keep their defaults.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned when the file cannot be read or is not a
    /// valid configuration document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::with_context(
                ErrorKind::Config,
                format!("Cannot read the configuration file '{}'", path.display()),
                e,
            )
        })?;

        let config = Self::from_json(&content).map_err(|e| {
            Error::with_context(
                ErrorKind::Config,
                format!("Invalid configuration file '{}'", path.display()),
                e,
            )
        })?;

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Deserialize`] error is returned when `json` is not a valid configuration
    /// document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }

    /// Checks the options that cannot be checked by their type alone.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned for a negative or non-finite delay, empty
    /// column or sheet names, an endpoint that is not an http(s) URL or when no implemented
    /// catalog source is listed.
    pub fn validate(&self) -> Result<(), Error> {
        if self.isbn_column_name.trim().is_empty() {
            return Err(Error::new(
                ErrorKind::Config,
                "isbn_column_name must not be empty",
            ));
        }

        if self.output_sheet_name.trim().is_empty() {
            return Err(Error::new(
                ErrorKind::Config,
                "output_sheet_name must not be empty",
            ));
        }

        self.delay()?;
        self.source()?;
        parse_endpoint(&self.google_books_url)?;
        Ok(())
    }

    /// The pause between two catalog requests.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned when `rate_limit_delay` is negative or not
    /// finite.
    pub fn delay(&self) -> Result<Duration, Error> {
        Duration::try_from_secs_f64(self.rate_limit_delay).map_err(|e| {
            Error::with_context(
                ErrorKind::Config,
                format!(
                    "rate_limit_delay of {} is not a valid number of seconds",
                    self.rate_limit_delay
                ),
                e,
            )
        })
    }

    /// The catalog source to use, the first source in `api_source_priority` that is
    /// implemented.
    ///
    /// Sources that are not implemented are skipped, an empty list selects the default source.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned when the list only names sources that are not
    /// implemented.
    pub fn source(&self) -> Result<&'static str, Error> {
        if self.api_source_priority.is_empty() {
            return Ok(SOURCES[0]);
        }

        for name in &self.api_source_priority {
            let name = name.trim().to_lowercase();
            if let Some(source) = SOURCES.iter().copied().find(|s| *s == name) {
                return Ok(source);
            }
            warn!("Catalog source '{name}' is not supported - skipping");
        }

        Err(Error::new(
            ErrorKind::Config,
            format!(
                "None of the catalog sources in api_source_priority are supported, expected one of: {}",
                SOURCES.join(", ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_fs::{fixture::FileWriteStr, NamedTempFile};

    use super::Config;
    use crate::ErrorKind;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();

        assert_eq!("ISBN", config.isbn_column_name);
        assert_eq!("Bibliography", config.output_sheet_name);
        assert_eq!(Duration::from_secs(1), config.delay().unwrap());
        assert_eq!(None, config.google_books_api_key);
        assert_eq!("google", config.source().unwrap());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = Config::from_json(
            r#"{ "isbn_column_name": "Barcode", "rate_limit_delay": 0.25, "google_books_api_key": null }"#,
        )
        .unwrap();

        assert_eq!("Barcode", config.isbn_column_name);
        assert_eq!(Duration::from_millis(250), config.delay().unwrap());
        assert_eq!("Bibliography", config.output_sheet_name);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = Config::from_json(r#"{ "rate_limit_delay": "slow" "#).unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn negative_delay_is_invalid() {
        let config = Config {
            rate_limit_delay: -1.0,
            ..Config::default()
        };

        assert_eq!(ErrorKind::Config, config.validate().unwrap_err().kind());
    }

    #[test]
    fn endpoint_must_be_http() {
        let config = Config {
            google_books_url: "file:///etc/passwd".to_owned(),
            ..Config::default()
        };

        assert_eq!(ErrorKind::Config, config.validate().unwrap_err().kind());
    }

    #[test]
    fn unsupported_sources_are_skipped() {
        let config = Config {
            api_source_priority: vec!["openlibrary".to_owned(), "Google".to_owned()],
            ..Config::default()
        };

        assert_eq!("google", config.source().unwrap());
    }

    #[test]
    fn only_unsupported_sources_is_invalid() {
        let config = Config {
            api_source_priority: vec!["openlibrary".to_owned()],
            ..Config::default()
        };

        assert_eq!(ErrorKind::Config, config.validate().unwrap_err().kind());
    }

    #[test]
    fn load_reads_file() {
        let file = NamedTempFile::new("config.json").unwrap();
        file.write_str(r#"{ "output_sheet_name": "Books" }"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!("Books", config.output_sheet_name);
    }

    #[test]
    fn load_of_missing_file_is_config_error() {
        let err = Config::load("does-not-exist.json").unwrap_err();
        assert_eq!(ErrorKind::Config, err.kind());
    }
}
