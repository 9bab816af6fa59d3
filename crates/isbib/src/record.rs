//! The output row of a bibliography and how it is formed from a lookup.

use crate::{
    catalog::{Lookup, Volume},
    isbn::{Isbn, ValidationError},
    table::Table,
};

/// The columns of a bibliography table, in output order.
pub const COLUMNS: [&str; 17] = [
    "Input ISBN",
    "Title",
    "Authors",
    "Publisher",
    "Publication Year",
    "ISBN-10",
    "ISBN-13",
    "Error",
    "Subtitle",
    "Publication Date",
    "Page Count",
    "Language",
    "Edition",
    "Categories",
    "Description",
    "Cover Image URL",
    "Source API",
];

/// One row of the bibliography, created for every input identifier.
///
/// On failure only `input`, `error` and, when the identifier was valid, the ISBN columns and
/// `source` are set. All metadata columns stay blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// The identifier exactly as it was read.
    pub input: String,
    /// Main title.
    pub title: Option<String>,
    /// Authors, joined with `", "` in the table.
    pub authors: Vec<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Four digit year taken from the publication date.
    pub publication_year: Option<String>,
    /// Locally computed ISBN-10, never taken from the catalog.
    pub isbn10: Option<String>,
    /// Locally computed ISBN-13, never taken from the catalog.
    pub isbn13: Option<String>,
    /// Human readable cause of the failure, [`None`] on success.
    pub error: Option<String>,
    /// Subtitle.
    pub subtitle: Option<String>,
    /// Publication date as the catalog reports it.
    pub publication_date: Option<String>,
    /// Number of pages.
    pub page_count: Option<u32>,
    /// ISO 639-1 language code.
    pub language: Option<String>,
    /// Edition statement, the catalogs do not report one so it is kept blank.
    pub edition: Option<String>,
    /// Subject categories, joined with `", "` in the table.
    pub categories: Vec<String>,
    /// Blurb or abstract.
    pub description: Option<String>,
    /// Link to a cover image.
    pub cover_url: Option<String>,
    /// Name of the catalog that was queried.
    pub source: Option<String>,
}

impl Record {
    /// Whether the identifier was resolved to metadata.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The cells of this record in [`COLUMNS`] order, blank cells for absent values.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();

        vec![
            self.input.clone(),
            opt(&self.title),
            self.authors.join(", "),
            opt(&self.publisher),
            opt(&self.publication_year),
            opt(&self.isbn10),
            opt(&self.isbn13),
            opt(&self.error),
            opt(&self.subtitle),
            opt(&self.publication_date),
            self.page_count.map(|n| n.to_string()).unwrap_or_default(),
            opt(&self.language),
            opt(&self.edition),
            self.categories.join(", "),
            opt(&self.description),
            opt(&self.cover_url),
            opt(&self.source),
        ]
    }

    fn fill(&mut self, volume: Volume) {
        self.publication_year = volume.publication_year().map(str::to_owned);

        let Volume {
            title,
            subtitle,
            authors,
            publisher,
            published_date,
            page_count,
            language,
            categories,
            description,
            cover_url,
            ..
        } = volume;

        self.title = title;
        self.subtitle = subtitle;
        self.authors = authors;
        self.publisher = publisher;
        self.publication_date = published_date;
        self.page_count = page_count;
        self.language = language;
        self.categories = categories;
        self.description = description;
        self.cover_url = cover_url;
    }
}

/// Forms the record of a single identifier.
///
/// `lookup` pairs the name of the queried catalog with its outcome and is expected to be
/// [`None`] exactly when `normalized` is an error, no lookup is made for invalid identifiers.
/// A valid identifier without a lookup only gets its ISBN columns.
#[must_use]
pub fn format(
    raw: &str,
    normalized: &Result<Isbn, ValidationError>,
    lookup: Option<(&str, Lookup)>,
) -> Record {
    let mut record = Record {
        input: raw.to_owned(),
        ..Record::default()
    };

    let isbn = match normalized {
        Ok(isbn) => isbn,
        Err(err) => {
            record.error = Some(err.to_string());
            return record;
        }
    };

    record.isbn10 = isbn.isbn10().map(str::to_owned);
    record.isbn13 = Some(isbn.isbn13().to_owned());

    let Some((source, lookup)) = lookup else {
        return record;
    };

    record.source = Some(source.to_owned());

    match lookup {
        Lookup::Found(volume) => record.fill(volume),
        Lookup::NotFound => {
            record.error = Some(format!(
                "No data found by {source} API for ISBN-13 {}",
                isbn.query()
            ));
        }
        Lookup::TransportError(detail) => {
            record.error = Some(format!("Lookup failed using {source} API: {detail}"));
        }
    }

    record
}

impl From<&[Record]> for Table {
    fn from(records: &[Record]) -> Self {
        let mut table = Table::new(COLUMNS.iter().map(|c| (*c).to_owned()).collect());
        for record in records {
            table.push(record.to_row());
        }
        table
    }
}
