use std::io::{self, Write};

use anyhow::{Context, Result};
use flex_settlement::VARIANT_TABLE;
use serde::Serialize;
use tabwriter::TabWriter;

use flex_cli::common::{write_json, write_jsonl, OutputFormat};

#[derive(Debug, Serialize)]
struct VariantRow {
    variant: String,
    scenario: u8,
    direction: &'static str,
    basis: &'static str,
    same_party: bool,
    compensation: &'static str,
    baseline: &'static str,
    description: &'static str,
}

fn rows() -> Vec<VariantRow> {
    VARIANT_TABLE
        .iter()
        .map(|binding| VariantRow {
            variant: binding.id.to_string(),
            scenario: binding.id.scenario.number(),
            direction: binding.id.direction.label(),
            basis: binding.basis.label(),
            same_party: binding.same_party,
            compensation: binding.compensation.label(),
            baseline: if binding.baseline.is_mirrored() {
                "mirrored"
            } else {
                "measured"
            },
            description: binding.description,
        })
        .collect()
}

pub fn handle(format: OutputFormat) -> Result<()> {
    let rows = rows();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => {
            let mut tw = TabWriter::new(&mut out).padding(2);
            writeln!(tw, "VARIANT\tDIRECTION\tBASIS\tBRP=BSP\tCOMPENSATION\tBASELINE")?;
            for row in &rows {
                writeln!(
                    tw,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    row.variant,
                    row.direction,
                    row.basis,
                    if row.same_party { "yes" } else { "no" },
                    row.compensation,
                    row.baseline
                )?;
            }
            tw.flush()?;
        }
        OutputFormat::Json => write_json(&rows, &mut out, true)?,
        OutputFormat::Jsonl => write_jsonl(&rows, &mut out)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(&mut out);
            for row in &rows {
                wtr.serialize(row).context("writing variant row")?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}
