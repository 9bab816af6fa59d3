//! Turns raw identifiers into [`Record`]s, one catalog lookup per valid identifier.

use std::{
    fmt, thread,
    time::{Duration, Instant},
};

use log::{info, trace, warn};

use crate::{
    catalog::{Catalog, Lookup},
    isbn::normalize,
    record::{self, Record},
    table::Table,
};

/// Keeps at least `delay` between the end of one catalog request and the start of the next.
///
/// Only the remainder of the delay is waited for, time spent between two calls to
/// [`Pacer::pace`] already counts towards it.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    /// A pacer that lets the first request through immediately.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Runs `request` once the delay since the previous request has passed.
    pub fn pace<T, F: FnOnce() -> T>(&mut self, request: F) -> T {
        if let Some(last) = self.last {
            let remaining = self.delay.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                trace!("Waiting {remaining:?} before the next request");
                thread::sleep(remaining);
            }
        }

        let response = request();
        self.last = Some(Instant::now());
        response
    }
}

/// Counts of the identifiers a [`Pipeline`] has processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Every identifier, valid or not.
    pub processed: usize,
    /// Identifiers that were resolved to metadata.
    pub succeeded: usize,
    /// Identifiers that were invalid or could not be resolved.
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total ISBNs processed: {}", self.processed)?;
        writeln!(f, "Successful lookups: {}", self.succeeded)?;
        write!(f, "Failed lookups: {}", self.failed)
    }
}

impl Summary {
    /// A one line report of the counts so far, out of `total` identifiers when that is known.
    #[must_use]
    pub const fn progress(self, total: Option<usize>) -> Progress {
        Progress {
            summary: self,
            total,
        }
    }
}

/// See [`Summary::progress`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    summary: Summary,
    total: Option<usize>,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Progress: {}", self.summary.processed)?;
        if let Some(total) = self.total {
            write!(f, "/{total}")?;
        }
        write!(
            f,
            " (Success: {}, Fail: {})",
            self.summary.succeeded, self.summary.failed
        )
    }
}

/// Processes identifiers in input order, strictly one at a time.
///
/// Every identifier produces exactly one [`Record`], a failing identifier never stops the
/// pipeline.
pub struct Pipeline<'c> {
    catalog: &'c dyn Catalog,
    pacer: Pacer,
    records: Vec<Record>,
    summary: Summary,
}

impl<'c> Pipeline<'c> {
    /// A pipeline looking identifiers up in `catalog`, at most one request per `delay`.
    #[must_use]
    pub fn new(catalog: &'c dyn Catalog, delay: Duration) -> Self {
        Self {
            catalog,
            pacer: Pacer::new(delay),
            records: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Processes a single identifier and returns its record.
    ///
    /// Invalid identifiers are recorded without contacting the catalog.
    pub fn process(&mut self, raw: &str) -> &Record {
        let normalized = normalize(raw);

        let record = match &normalized {
            Ok(isbn) => {
                trace!("'{raw}' is ISBN-13 {isbn}");
                let catalog = self.catalog;
                let lookup = self.pacer.pace(|| catalog.lookup(isbn));
                if let Lookup::TransportError(detail) = &lookup {
                    warn!("Lookup of '{raw}' failed: {detail}");
                }
                record::format(raw, &normalized, Some((catalog.name(), lookup)))
            }
            Err(err) => {
                warn!("Skipping lookup of '{raw}': {err} ({err:?})");
                record::format(raw, &normalized, None)
            }
        };

        self.summary.processed += 1;
        if record.is_success() {
            self.summary.succeeded += 1;
            info!(
                "Found '{}' for '{raw}'",
                record.title.as_deref().unwrap_or_default()
            );
        } else {
            self.summary.failed += 1;
        }

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Processes every identifier of `isbns` in order.
    pub fn run<I, S>(&mut self, isbns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run_with(isbns, |_, _| {});
    }

    /// Processes every identifier of `isbns` in order, calling `report` with each new record
    /// and the counts so far.
    pub fn run_with<I, S, F>(&mut self, isbns: I, mut report: F)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&Record, Summary),
    {
        for raw in isbns {
            self.process(raw.as_ref());
            if let Some(record) = self.records.last() {
                report(record, self.summary);
            }
        }
    }

    /// Counts of the identifiers processed so far.
    #[must_use]
    pub const fn summary(&self) -> Summary {
        self.summary
    }

    /// The records produced so far, in input order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the pipeline returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Consumes the pipeline returning its records as a bibliography table.
    #[must_use]
    pub fn into_table(self) -> Table {
        Table::from(self.records.as_slice())
    }
}
