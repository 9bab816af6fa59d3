//! Line based identifier input as produced by a barcode scanner emulating a keyboard.

use std::io::BufRead;

use log::{error, trace};

/// The line that ends a scan session, it is never treated as an identifier.
pub const SENTINEL: &str = "QUITSCAN";

/// Identifiers from a sequence of lines up to, but excluding, the [`SENTINEL`].
///
/// Lines are trimmed and blank lines skipped. The sequence also ends when `lines` does.
pub fn until_sentinel<I>(lines: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .take_while(|line| {
            let more = line != SENTINEL;
            if !more {
                trace!("{SENTINEL} read - ending scan session");
            }
            more
        })
}

/// Identifiers read line by line from `reader` until the [`SENTINEL`] or the end of input.
///
/// A read error ends the session like the end of input does so that the identifiers read so
/// far can still be written.
pub fn lines<R: BufRead>(reader: R) -> impl Iterator<Item = String> {
    until_sentinel(reader.lines().map_while(|line| match line {
        Ok(line) => Some(line),
        Err(err) => {
            error!("Cannot read further input - ending scan session: {err}");
            None
        }
    }))
}
