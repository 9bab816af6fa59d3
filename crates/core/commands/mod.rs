use std::path::{Path, PathBuf};

use crate::{file, interact};

use isbib::{Catalog, Config, Pipeline};

use clap::{AppSettings, Subcommand};
use log::{trace, warn};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Look up every ISBN in a column of a CSV or spreadsheet file
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Batch {
        /// The table to read the ISBNs from (.csv, .xlsx, .xls, .xlsm or .ods)
        #[clap(parse(from_os_str))]
        input: PathBuf,
        /// The file to write the bibliography to (.csv or .xlsx)
        #[clap(parse(from_os_str))]
        output: PathBuf,
        /// Add the new rows after the rows already in the output file instead of replacing it
        #[clap(short, long)]
        append: bool,
    },
    /// Look up ISBNs as they are scanned or typed, one per line, until QUITSCAN is entered
    ///
    /// The new rows are always added after the rows already in the output file.
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Scan {
        /// The file to write the bibliography to (.csv or .xlsx)
        #[clap(parse(from_os_str))]
        output: PathBuf,
    },
}

impl Commands {
    /// Runs the command, printing a progress line per ISBN when `progress` is set, and returns
    /// the summary to print.
    pub fn execute(
        self,
        config: &Config,
        catalog: &dyn Catalog,
        progress: bool,
    ) -> eyre::Result<String> {
        match self {
            Self::Batch {
                input,
                output,
                append,
            } => batch(config, catalog, &input, &output, append, progress),
            Self::Scan { output } => scan(config, catalog, &output, progress),
        }
    }
}

fn batch(
    config: &Config,
    catalog: &dyn Catalog,
    input: &Path,
    output: &Path,
    append: bool,
    progress: bool,
) -> eyre::Result<String> {
    trace!("batch subcommand called with input '{}'", input.display());
    let mut output = file::output_file(output, config, append)?;
    let isbns = file::read_isbns(input, config)?;

    if isbns.is_empty() {
        warn!(
            "No ISBNs found in the '{}' column of '{}' - nothing written",
            config.isbn_column_name,
            input.display()
        );
        return Ok("No ISBNs to process".to_owned());
    }

    let total = isbns.len();
    let mut pipeline = Pipeline::new(catalog, config.delay()?);
    pipeline.run_with(&isbns, |_, summary| {
        if progress {
            println!("{}", summary.progress(Some(total)));
        }
    });

    let summary = pipeline.summary();
    file::write_bibliography(&mut output, pipeline.into_table(), append)?;

    Ok(format!(
        "{summary}\nBibliography written to '{}'",
        output.path().display()
    ))
}

fn scan(
    config: &Config,
    catalog: &dyn Catalog,
    output: &Path,
    progress: bool,
) -> eyre::Result<String> {
    trace!("scan subcommand called");
    let mut output = file::output_file(output, config, true)?;

    let mut pipeline = Pipeline::new(catalog, config.delay()?);
    pipeline.run_with(interact::scanned_isbns(), |_, summary| {
        if progress {
            println!("{}", summary.progress(None));
        }
    });

    if pipeline.records().is_empty() {
        warn!("No ISBNs scanned - nothing written");
        return Ok("No ISBNs to process".to_owned());
    }

    let summary = pipeline.summary();
    file::write_bibliography(&mut output, pipeline.into_table(), true)?;

    Ok(format!(
        "{summary}\nBibliography written to '{}'",
        output.path().display()
    ))
}
