use anyhow::Result;
use std::path::Path;

use authorship_classifiers::io::write_table_tsv;
use authorship_classifiers::preprocessing::{preprocess, DatasetSplit};

use crate::util::validate_tsv_or_csv_file;

/// Preprocess a raw tweet dump and write the processed table as TSV.
pub fn run_preprocess(input: &str, split: DatasetSplit, output: &Path) -> Result<()> {
    validate_tsv_or_csv_file(input)?;
    let table = preprocess(input, split)?;
    write_table_tsv(&table, output)?;
    log::info!(
        "Wrote {} rows x {} columns to {}",
        table.nrows(),
        table.ncols(),
        output.display()
    );
    Ok(())
}
