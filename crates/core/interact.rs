use std::io::{self, IsTerminal};

use isbib::scan::{self, SENTINEL};

use dialoguer::Input;
use log::{error, trace};

/// ISBNs entered on stdin until the scan session ends.
///
/// A terminal gets a prompt per ISBN, anything else (a pipe or a redirected file) is read line
/// by line.
pub fn scanned_isbns() -> Box<dyn Iterator<Item = String>> {
    let stdin = io::stdin();

    if stdin.is_terminal() {
        trace!("stdin is a terminal - prompting for every ISBN");
        Box::new(scan::until_sentinel(prompted_lines()))
    } else {
        trace!("stdin is not a terminal - reading ISBNs line by line");
        Box::new(scan::lines(stdin.lock()))
    }
}

fn prompted_lines() -> impl Iterator<Item = String> {
    std::iter::from_fn(|| {
        match Input::<String>::new()
            .with_prompt(format!("Scan ISBN ({SENTINEL} to finish)"))
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Some(line),
            Err(err) => {
                error!("Cannot read further input - ending scan session: {err}");
                None
            }
        }
    })
}
