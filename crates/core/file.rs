use std::path::Path;

use isbib::{Config, Reader, Table, TableFile, Writer};

use eyre::{eyre, Context, Result};
use log::{info, trace};

/// Opens the bibliography output, checking everything that could stop it from being written
/// later so that no lookups are wasted.
///
/// When `append` is set an existing output must also be readable.
pub fn output_file(path: &Path, config: &Config, append: bool) -> Result<TableFile> {
    let mut file = TableFile::new(path, Some(&config.output_sheet_name))
        .wrap_err_with(|| format!("Cannot use '{}' as the output file", path.display()))?;

    if !file.kind().writable() {
        return Err(eyre!(
            "Cannot write a {} - the output file must be a .csv or .xlsx file",
            file.kind().name()
        ));
    }

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.is_dir() {
            return Err(eyre!(
                "The directory '{}' of the output file does not exist",
                dir.display()
            ));
        }
    }

    if append && file.exists() {
        trace!("Checking the existing output file can be appended to..");
        file.read().wrap_err_with(|| {
            format!(
                "Cannot append to '{}' as its content cannot be read",
                path.display()
            )
        })?;
    }

    Ok(file)
}

/// The raw ISBNs of the configured column of the input table.
pub fn read_isbns(path: &Path, config: &Config) -> Result<Vec<String>> {
    info!(
        "Reading ISBNs from the '{}' column of '{}'",
        config.isbn_column_name,
        path.display()
    );
    isbib::read_isbns(path, None, &config.isbn_column_name)
        .wrap_err_with(|| format!("Cannot read the ISBNs of '{}'", path.display()))
}

/// Writes the bibliography, after the rows already in the file when `append` is set.
pub fn write_bibliography(file: &mut TableFile, table: Table, append: bool) -> Result<()> {
    let res = if append {
        trace!("Appending to '{}'", file.path().display());
        file.append(table).map(drop)
    } else {
        trace!("Replacing '{}'", file.path().display());
        file.write(&table)
    };

    res.wrap_err_with(|| {
        format!(
            "Cannot write the bibliography to '{}'",
            file.path().display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        TempDir,
    };

    fn temp_dir() -> TempDir {
        TempDir::new().expect("Cannot create temp directory for test")
    }

    #[test]
    #[should_panic(expected = "must be a .csv or .xlsx file")]
    fn read_only_output_format() {
        let dir = temp_dir();
        output_file(dir.child("out.ods").path(), &Config::default(), false).unwrap();
    }

    #[test]
    #[should_panic(expected = "Cannot use 'out.txt' as the output file")]
    fn unknown_output_format() {
        output_file(Path::new("out.txt"), &Config::default(), false).unwrap();
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn missing_output_directory() {
        let dir = temp_dir();
        output_file(
            dir.child("missing").child("out.csv").path(),
            &Config::default(),
            false,
        )
        .unwrap();
    }

    #[test]
    fn bare_file_name_is_in_current_directory() {
        assert!(output_file(Path::new("out.csv"), &Config::default(), false).is_ok());
    }

    #[test]
    #[should_panic(expected = "Cannot append to")]
    fn unreadable_existing_output_with_append() {
        let dir = temp_dir();
        let out = dir.child("out.xlsx");
        out.write_str("not a workbook").unwrap();

        output_file(out.path(), &Config::default(), true).unwrap();
    }

    #[test]
    fn unreadable_existing_output_is_replaced_without_append() {
        let dir = temp_dir();
        let out = dir.child("out.xlsx");
        out.write_str("not a workbook").unwrap();

        assert!(output_file(out.path(), &Config::default(), false).is_ok());
    }

    #[test]
    fn write_replaces_or_appends() {
        let dir = temp_dir();
        let out = dir.child("out.csv");
        let mut file = output_file(out.path(), &Config::default(), true).unwrap();

        let mut table = Table::new(vec!["Input ISBN".to_owned()]);
        table.push(vec!["bad".to_owned()]);

        write_bibliography(&mut file, table.clone(), true).unwrap();
        write_bibliography(&mut file, table.clone(), true).unwrap();
        assert_eq!(2, file.read().unwrap().len());

        write_bibliography(&mut file, table, false).unwrap();
        assert_eq!(1, file.read().unwrap().len());
    }

    #[test]
    fn isbns_of_configured_column() {
        let dir = temp_dir();
        let input = dir.child("in.csv");
        input.write_str("Barcode\n0306406152\n\n").unwrap();

        let config = Config {
            isbn_column_name: "Barcode".to_owned(),
            ..Config::default()
        };

        assert_eq!(
            vec!["0306406152".to_owned()],
            read_isbns(input.path(), &config).unwrap()
        );
    }
}
