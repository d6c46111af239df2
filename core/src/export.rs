//! CSV export.
//!
//! One header row of the table's columns, then one line per row in table
//! order. Null cells are empty fields. A field is quoted only when it
//! contains a comma, a double quote or a line break; embedded quotes are
//! doubled.

use crate::{
    error::{GenError, GenResult},
    table::{Dataset, TableView},
};
use std::{
    borrow::Cow,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub fn write_csv<W: Write>(out: &mut W, table: &dyn TableView) -> GenResult<()> {
    write_record(out, table.columns().iter().copied())?;
    for row in table.value_rows() {
        let cells: Vec<String> = row.iter().map(|v| v.render()).collect();
        write_record(out, cells.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Write `<table>.csv` for every table into `dir`, creating it if needed.
/// Returns the written paths in generation order.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> GenResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for table in dataset.tables() {
        let path = dir.join(format!("{}.csv", table.name()));
        let mut out = BufWriter::new(File::create(&path)?);
        write_csv(&mut out, table)?;
        out.flush()?;
        log::info!("Wrote {} rows to {}", table.row_count(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// Render a whole table to a string. Used for reproducibility checks.
pub fn to_csv_string(table: &dyn TableView) -> GenResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table)?;
    String::from_utf8(buf).map_err(|e| GenError::Other(e.into()))
}

fn write_record<'a, W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> GenResult<()> {
    let line: Vec<Cow<'a, str>> = fields.map(escape).collect();
    out.write_all(line.join(",").as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape("Checking"), "Checking");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn separators_and_quotes_are_quoted() {
        assert_eq!(escape("Austin, TX"), "\"Austin, TX\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn record_joins_with_commas() {
        let mut buf = Vec::new();
        write_record(&mut buf, ["a", "", "c, d"].into_iter()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,,\"c, d\"\n");
    }
}
