use std::io::{self, Write};

use anyhow::Result;
use flex_core::ParameterSet;
use flex_settlement::SettlementTables;
use tracing::info;

use flex_cli::cli::{ParamArgs, TableSelection};
use flex_cli::common::{resolve_inputs, write_json, write_jsonl, write_table_text, OutputFormat};

pub fn handle(params: &ParamArgs, selection: TableSelection, format: OutputFormat) -> Result<()> {
    let inputs = resolve_inputs(params)?;
    let tables = SettlementTables::from_parameters(&ParameterSet::resolve(&inputs));
    let selected: Vec<_> = selection
        .kinds()
        .into_iter()
        .map(|kind| tables.get(kind))
        .collect();
    info!(tables = selected.len(), "settled all variants");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => {
            for (idx, table) in selected.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                write_table_text(table, &mut out)?;
            }
        }
        OutputFormat::Json => {
            let docs: Vec<_> = selected.iter().map(|table| table.to_json()).collect();
            match docs.as_slice() {
                [single] => write_json(single, &mut out, true)?,
                _ => write_json(&docs, &mut out, true)?,
            }
        }
        OutputFormat::Jsonl => {
            let docs: Vec<_> = selected.iter().map(|table| table.to_json()).collect();
            write_jsonl(&docs, &mut out)?;
        }
        OutputFormat::Csv => {
            for (idx, table) in selected.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                flex_io::write_table_csv_to(table, &mut out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
