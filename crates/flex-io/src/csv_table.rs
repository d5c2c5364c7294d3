//! Spreadsheet-style CSV: `Field,1a,…,5b,Unit`, one row per field.
//!
//! Numbers are written with the shortest representation that parses back to
//! the same `f64`, so a written table reads back equal.

use anyhow::{anyhow, Context, Result};
use flex_core::{Figure, FlexError, Unit, VariantId};
use flex_settlement::{FieldSpec, Table, TableKind};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const FIELD_HEADER: &str = "Field";
const UNIT_HEADER: &str = "Unit";

pub fn write_table_csv_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let variants: Vec<VariantId> = table.variants().collect();

    let mut header = vec![FIELD_HEADER.to_string()];
    header.extend(variants.iter().map(VariantId::to_string));
    header.push(UNIT_HEADER.to_string());
    wtr.write_record(&header).context("writing CSV header")?;

    for (idx, field) in table.fields().iter().enumerate() {
        let mut record = Vec::with_capacity(variants.len() + 2);
        record.push(field.name.clone());
        record.extend(table.row_at(idx).into_iter().map(|(_, figure)| figure.to_string()));
        record.push(field.unit.to_string());
        wtr.write_record(&record)
            .with_context(|| format!("writing CSV row '{}'", field.name))?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn write_table_csv(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating CSV file '{}'", path.display()))?;
    write_table_csv_to(table, file)
        .with_context(|| format!("writing table '{}' to '{}'", table.key(), path.display()))?;
    debug!(table = table.key(), path = %path.display(), "wrote CSV table");
    Ok(())
}

pub fn read_table_csv_from<R: Read>(reader: R, kind: TableKind) -> Result<Table> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("reading CSV header")?.clone();

    let n = headers.len();
    if n < 2 || &headers[0] != FIELD_HEADER || &headers[n - 1] != UNIT_HEADER {
        return Err(FlexError::Export(format!(
            "CSV header must start with '{FIELD_HEADER}' and end with '{UNIT_HEADER}'"
        ))
        .into());
    }
    let variants = headers
        .iter()
        .skip(1)
        .take(n - 2)
        .map(|h| h.parse::<VariantId>().map_err(|err| anyhow!(err)))
        .collect::<Result<Vec<_>>>()
        .context("parsing variant columns")?;
    if let Some(dup) = variants
        .iter()
        .enumerate()
        .find_map(|(i, v)| variants[..i].contains(v).then_some(*v))
    {
        return Err(FlexError::Export(format!("CSV header repeats variant column '{dup}'")).into());
    }

    let mut fields = Vec::new();
    let mut columns: Vec<Vec<Figure>> = vec![Vec::new(); variants.len()];
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", line + 1))?;
        if record.len() != n {
            return Err(FlexError::Export(format!(
                "CSV row {} has {} cells, expected {n}",
                line + 1,
                record.len()
            ))
            .into());
        }
        let unit: Unit = record[n - 1]
            .parse()
            .map_err(|err| anyhow!("CSV row {}: {err}", line + 1))?;
        fields.push(FieldSpec::new(&record[0], unit));
        for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
            let figure = Figure::parse_cell(cell)
                .ok_or_else(|| anyhow!("CSV row {}: invalid cell '{cell}'", line + 1))?;
            column.push(figure);
        }
    }

    let mut table = Table::new(kind, fields);
    for (variant, figures) in variants.into_iter().zip(columns) {
        table
            .insert_column(variant, figures)
            .map_err(|err| anyhow!(err))?;
    }
    Ok(table)
}

/// Read a table written by [`write_table_csv`]; the file stem names its kind.
pub fn read_table_csv(path: &Path) -> Result<Table> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            FlexError::Export(format!("cannot infer table kind from '{}'", path.display()))
        })?;
    let kind: TableKind = stem.parse().map_err(|err| anyhow!("{err}"))?;
    let file = File::open(path)
        .with_context(|| format!("opening CSV file '{}'", path.display()))?;
    read_table_csv_from(file, kind)
        .with_context(|| format!("reading table from '{}'", path.display()))
}
