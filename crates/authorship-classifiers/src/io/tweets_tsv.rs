//! Headerless tweet TSV reader and processed-table writer.
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::data_handling::{Column, Table};

/// Read a headerless, tab-separated tweet dump into a table of text columns.
///
/// Field `i` of every row is stored under `columns[i]`. Quote characters are
/// kept verbatim since tweets routinely contain unbalanced quotes. Surplus
/// fields are ignored. Rows with an absent or empty field are dropped.
pub fn read_raw_tsv<P: AsRef<Path>>(path: P, columns: &[&str]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(&path)
        .with_context(|| format!("Failed to open TSV file: {}", path.as_ref().display()))?;

    let mut values: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
    let mut dropped = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let complete = (0..columns.len())
            .all(|i| record.get(i).map(|v| !v.trim().is_empty()).unwrap_or(false));
        if !complete {
            dropped += 1;
            continue;
        }

        for (i, column) in values.iter_mut().enumerate() {
            column.push(record.get(i).unwrap_or_default().to_string());
        }
    }

    if dropped > 0 {
        debug!("Dropped {} rows with missing fields", dropped);
    }

    let mut table = Table::new();
    for (name, column) in columns.iter().zip(values) {
        table.insert_column(*name, Column::Text(column));
    }

    info!(
        "Loaded {} rows x {} columns from {}",
        table.nrows(),
        table.ncols(),
        path.as_ref().display()
    );

    Ok(table)
}

/// Write a table as TSV with a header row.
pub fn write_table_tsv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .with_context(|| format!("Failed to create TSV file: {}", path.as_ref().display()))?;

    writer.write_record(table.names())?;

    let columns: Vec<&Column> = table.columns().map(|(_, c)| c).collect();
    for row in 0..table.nrows() {
        writer.write_record(columns.iter().map(|c| c.cell(row)))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn drops_rows_with_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\t@a\thello \"world\"\t2016-01-01 10:00:00\tandroid").unwrap();
        writeln!(file, "2\t@b\t\t2016-01-01 10:00:00\tiphone").unwrap();
        writeln!(file, "3\t@c\tshort row").unwrap();
        writeln!(file, "4\t@d\tbye\t2016-01-02 11:00:00\tiphone\textra").unwrap();
        file.flush().unwrap();

        let table = read_raw_tsv(
            file.path(),
            &["tweet_id", "user_handle", "text", "timestamp", "device"],
        )
        .unwrap();

        assert_eq!(table.nrows(), 2);
        assert_eq!(
            table.text("tweet_id").unwrap(),
            &["1".to_string(), "4".to_string()]
        );
        assert_eq!(table.text("text").unwrap()[0], "hello \"world\"");
    }
}
