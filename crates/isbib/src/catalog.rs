//! The [`Catalog`] trait and the values a catalog lookup produces.

use crate::isbn::Isbn;

/// A remote source of bibliographic metadata keyed by ISBN.
///
/// Implementations issue exactly one request per [`Catalog::lookup`] and never retry, pacing
/// between requests is the caller's concern.
pub trait Catalog {
    /// The short name of the source, as used in `api_source_priority`.
    fn name(&self) -> &str;

    /// Looks up the metadata of a single book.
    ///
    /// Every outcome is reported through [`Lookup`], a failing lookup never aborts the caller.
    fn lookup(&self, isbn: &Isbn) -> Lookup;
}

/// The outcome of a single catalog query.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    /// The catalog returned at least one match, this is the first one.
    Found(Volume),
    /// The catalog was reached but had no match.
    NotFound,
    /// The catalog could not be reached or answered with something that could not be
    /// understood.
    TransportError(String),
}

/// Bibliographic metadata of a single book as reported by a catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Volume {
    /// Main title.
    pub title: Option<String>,
    /// Subtitle, if the catalog separates it from the title.
    pub subtitle: Option<String>,
    /// Authors in the order the catalog lists them.
    pub authors: Vec<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Publication date as reported, `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub published_date: Option<String>,
    /// ISBN-10 the catalog reports for this volume.
    pub isbn10: Option<String>,
    /// ISBN-13 the catalog reports for this volume.
    pub isbn13: Option<String>,
    /// Number of pages.
    pub page_count: Option<u32>,
    /// ISO 639-1 language code.
    pub language: Option<String>,
    /// Subject categories.
    pub categories: Vec<String>,
    /// Blurb or abstract.
    pub description: Option<String>,
    /// Link to a cover image.
    pub cover_url: Option<String>,
}

impl Volume {
    /// The year part of the publication date.
    ///
    /// Only a leading four digit year is accepted, anything else gives [`None`].
    #[must_use]
    pub fn publication_year(&self) -> Option<&str> {
        self.published_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
    }

    /// Identifiers reported by the catalog that disagree with the locally computed forms.
    ///
    /// The local forms always win, this only exists to surface suspicious matches.
    #[must_use]
    pub fn mismatched_identifiers<'v>(&'v self, isbn: &Isbn) -> Vec<&'v str> {
        let mut mismatched = Vec::new();

        if let Some(reported) = self.isbn13.as_deref() {
            if reported != isbn.isbn13() {
                mismatched.push(reported);
            }
        }

        if let (Some(reported), Some(local)) = (self.isbn10.as_deref(), isbn.isbn10()) {
            if !reported.eq_ignore_ascii_case(local) {
                mismatched.push(reported);
            }
        }

        mismatched
    }
}
