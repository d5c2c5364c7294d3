//! Writing a full set of settlement tables to a directory.

use anyhow::{Context, Result};
use flex_settlement::{SettlementTables, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::csv_table::write_table_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub fn write_table_json(table: &Table, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&table.to_json())
        .with_context(|| format!("serializing table '{}' to JSON", table.key()))?;
    fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}

/// Write all six tables as `<key>.csv` or `<key>.json` under `dir`.
///
/// Returns the written paths in table order.
pub fn export_tables(tables: &SettlementTables, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory '{}'", dir.display()))?;

    let mut written = Vec::new();
    for table in tables.iter() {
        let path = dir.join(format!("{}.{}", table.key(), format.extension()));
        match format {
            ExportFormat::Csv => write_table_csv(table, &path)?,
            ExportFormat::Json => write_table_json(table, &path)?,
        }
        written.push(path);
    }
    info!(
        dir = %dir.display(),
        tables = written.len(),
        format = format.extension(),
        "exported settlement tables"
    );
    Ok(written)
}
