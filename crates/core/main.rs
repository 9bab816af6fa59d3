#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod commands;
mod file;
mod interact;

use commands::Commands;

use isbib::Config;

use clap::{Args, Parser};
use eyre::{Context, Result};
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                config,
                column,
                sheet,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let config = load_config(config, column, sheet)?;
    let catalog = isbib::catalog(&config).wrap_err("Cannot set up the catalog")?;

    let message = command.execute(&config, catalog.as_ref(), !quiet)?;

    if !quiet {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .verbosity(verbosity)
        .init()
        .wrap_err("Cannot set up logging")
}

fn load_config(
    path: Option<PathBuf>,
    column: Option<String>,
    sheet: Option<String>,
) -> Result<Config> {
    let mut config = if let Some(path) = path {
        trace!("'config' option used with value of '{}'", path.display());
        Config::load(path)?
    } else {
        trace!("'config' option not used - using the default configuration");
        Config::default()
    };

    if let Some(column) = column {
        trace!("'column' option overrides isbn_column_name with '{column}'");
        config.isbn_column_name = column;
    }

    if let Some(sheet) = sheet {
        trace!("'sheet' option overrides output_sheet_name with '{sheet}'");
        config.output_sheet_name = sheet;
    }

    config
        .validate()
        .wrap_err("The configuration cannot be used")?;
    Ok(config)
}

#[derive(Parser)]
#[clap(name = "isbib")]
#[clap(about = "Build a bibliography spreadsheet from ISBNs read from a table or a barcode scanner")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// A JSON configuration file, options it leaves out keep their defaults
    #[clap(short, long, parse(from_os_str), global = true)]
    config: Option<PathBuf>,

    /// The name of the input column holding the ISBNs, overrides `isbn_column_name`
    #[clap(long, global = true)]
    column: Option<String>,

    /// The name of the sheet written to .xlsx outputs, overrides `output_sheet_name`
    #[clap(long, global = true)]
    sheet: Option<String>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
