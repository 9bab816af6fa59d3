use std::path::Path;

use crate::{Error, ErrorKind};

use super::Table;

pub(crate) fn read(path: &Path) -> Result<Table, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| context(e, "Cannot open", path))?;

    let headers = reader
        .headers()
        .map_err(|e| context(e, "Cannot read the header row of", path))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| context(e, "Cannot read a row of", path))?;
        table.push(record.iter().map(str::to_owned).collect());
    }

    Ok(table)
}

pub(crate) fn write(path: &Path, table: &Table) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| context(e, "Cannot create", path))?;

    writer
        .write_record(table.headers())
        .map_err(|e| context(e, "Cannot write to", path))?;

    for row in table.rows() {
        writer
            .write_record(row.cells())
            .map_err(|e| context(e, "Cannot write to", path))?;
    }

    writer
        .flush()
        .map_err(|e| context(e, "Cannot write to", path))
}

fn context<E>(err: E, action: &str, path: &Path) -> Error
where
    E: Into<crate::error::DynError>,
{
    Error::with_context(
        ErrorKind::Table,
        format!("{action} the CSV file '{}'", path.display()),
        err,
    )
}
