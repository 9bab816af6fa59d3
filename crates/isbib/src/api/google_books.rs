use log::{info, trace, warn};
use reqwest::Url;
use serde::Deserialize;

use crate::{
    catalog::{Catalog, Lookup, Volume},
    config::Config,
    isbn::Isbn,
    Error, ErrorKind,
};

use super::Client;

/// The default endpoint of the Google Books volumes API.
pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

pub(crate) const NAME: &str = "google";

/// The Google Books volumes API as a [`Catalog`].
///
/// Requests are unauthenticated unless an API key is configured, a key only raises the quota.
pub struct GoogleBooks<C = reqwest::blocking::Client> {
    client: C,
    endpoint: Url,
    api_key: Option<String>,
}

impl<C: Client> GoogleBooks<C> {
    /// Creates a catalog querying `endpoint`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned when the endpoint is not an absolute http(s)
    /// URL.
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self, Error> {
        Ok(Self {
            client: C::default(),
            endpoint: parse_endpoint(endpoint)?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Creates a catalog from the `google_books_*` options of the [`Config`].
    ///
    /// # Errors
    ///
    /// See [`GoogleBooks::new`].
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            &config.google_books_url,
            config.google_books_api_key.clone(),
        )
    }

    fn url(&self, query: &str) -> String {
        let mut url = self.endpoint.clone();
        let search = match self.endpoint.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&q=isbn:{query}"),
            _ => format!("q=isbn:{query}"),
        };
        url.set_query(Some(&search));
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url.to_string()
    }

    /// Returns the first volume matching the ISBN or [`None`] when there are no matches.
    fn get_volume(&self, query: &str) -> Result<Option<Volume>, Error> {
        info!("Searching for ISBN '{query}' using Google Books API");

        let GoogleModel { items } = self.client.get_json(&self.url(query))?;

        trace!("Request was successful with {} item(s)", items.len());

        // Only the first match is used, Google Books orders by relevance.
        Ok(items.into_iter().next().map(Volume::from))
    }
}

impl<C: Client> Catalog for GoogleBooks<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn lookup(&self, isbn: &Isbn) -> Lookup {
        match self.get_volume(isbn.query()) {
            Ok(Some(volume)) => {
                for reported in volume.mismatched_identifiers(isbn) {
                    warn!(
                        "Google Books reported the identifier '{reported}' for ISBN '{isbn}' - keeping the local value"
                    );
                }
                Lookup::Found(volume)
            }
            Ok(None) => Lookup::NotFound,
            Err(err) => Lookup::TransportError(err.to_string()),
        }
    }
}

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, Error> {
    let url = Url::parse(endpoint).map_err(|e| {
        Error::with_context(
            ErrorKind::Config,
            format!("'{endpoint}' is not a valid catalog endpoint"),
            e,
        )
    })?;

    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(Error::new(
            ErrorKind::Config,
            format!("Catalog endpoint '{endpoint}' must use http or https"),
        ))
    }
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    // missing entirely when `totalItems` is 0
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
    language: Option<String>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    small_thumbnail: Option<String>,
    thumbnail: Option<String>,
}

impl From<Item> for Volume {
    fn from(item: Item) -> Self {
        // Deconstruct item to take ownership of fields (avoids cloning).
        let VolumeInfo {
            title,
            subtitle,
            mut authors,
            publisher,
            published_date,
            description,
            industry_identifiers,
            page_count,
            categories,
            image_links,
            language,
        } = item.volume_info;

        authors.retain(|author| !author.is_empty());

        let mut volume = Self {
            title,
            subtitle,
            authors,
            publisher,
            published_date,
            page_count,
            language,
            categories,
            description,
            cover_url: image_links.and_then(|links| links.thumbnail.or(links.small_thumbnail)),
            ..Self::default()
        };

        for IndustryIdentifier { kind, identifier } in industry_identifiers {
            match kind.as_str() {
                "ISBN_10" => volume.isbn10 = Some(identifier),
                "ISBN_13" => volume.isbn13 = Some(identifier),
                _ => {}
            }
        }

        volume
    }
}
