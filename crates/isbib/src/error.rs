use std::fmt;

pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// A failure that stops a whole run, such as an unusable configuration or an unreadable table.
///
/// Per identifier failures (validation, lookups) are never reported through this type, they
/// end up in the `Error` column of a [`Record`](crate::Record) instead.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// What went wrong, the first part of an [`Error`]'s message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A request or file operation failed.
    IO,
    /// A response or document did not have the expected shape.
    Deserialize,
    /// Something expected to be present was missing.
    NoValue,
    /// The configuration is unusable.
    Config,
    /// A table could not be read, written or does not have the expected shape.
    Table,
}

impl Error {
    /// An error described by `message` alone.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// An error that is fully described by its `source`.
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// An error caused by `source` while doing what `message` describes.
    pub fn with_context<S, E>(kind: ErrorKind, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<DynError>,
    {
        Self {
            source: Some(source.into()),
            ..Self::new(kind, message)
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IO => "IO",
            Self::Deserialize => "Deserialize",
            Self::NoValue => "No value",
            Self::Config => "Config",
            Self::Table => "Table",
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error", self.kind)?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}
