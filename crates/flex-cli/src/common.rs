//! Common CLI types and utilities shared across commands.

use anyhow::{Context, Result};
use clap::ValueEnum;
use flex_core::ParameterInputs;
use flex_io::load_parameters;
use flex_settlement::Table;
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tabwriter::TabWriter;
use tracing::{debug, warn};

use crate::cli::ParamArgs;

/// Environment variable naming a parameter file.
pub const PARAMS_ENV: &str = "FLEX_PARAMS";

/// Output format for tabular/structured data.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable aligned table (default for interactive use)
    #[default]
    Table,
    /// JSON object or array (pipe-friendly, structured)
    Json,
    /// JSON Lines - one JSON object per line (streaming-friendly)
    Jsonl,
    /// Comma-separated values (pipe to awk/cut/etc)
    Csv,
}

/// Per-user parameter file, used when nothing else is given.
pub fn default_params_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flex-settle").join("params.toml"))
}

/// Where parameters come from: `--params`, then `$FLEX_PARAMS`, then the
/// per-user file if it exists.
pub fn parameter_source(args: &ParamArgs) -> Option<PathBuf> {
    args.params
        .clone()
        .or_else(|| env::var_os(PARAMS_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| default_params_path().filter(|path| path.is_file()))
}

impl ParamArgs {
    /// Apply every flag that was given on top of `inputs`.
    pub fn apply_overrides(&self, inputs: &mut ParameterInputs) {
        let values = [
            (&mut inputs.v_da, self.v_da),
            (&mut inputs.e_bud, self.e_bud),
            (&mut inputs.e_akt, self.e_akt),
            (&mut inputs.p_da, self.p_da),
            (&mut inputs.p_imb, self.p_imb),
        ];
        for (slot, value) in values {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(trade) = self.trade {
            inputs.trade_direction = trade;
        }
        for (slot, value) in [
            (&mut inputs.e_cons, self.e_cons),
            (&mut inputs.p_comp, self.p_comp),
            (&mut inputs.p_pen, self.p_pen),
            (&mut inputs.p_recomp, self.p_recomp),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }

        let toggles = &mut inputs.toggles;
        for (slot, value) in [
            (&mut toggles.brp_forwards_imbalance_cost, self.brp_forwards_imbalance_cost),
            (&mut toggles.re_forwards_imbalance_cost, self.re_forwards_imbalance_cost),
            (&mut toggles.apply_deviation_penalty, self.apply_deviation_penalty),
            (&mut toggles.bsp_buys_on_downregulation, self.bsp_buys_on_downregulation),
            (&mut toggles.reverse_compensation_variant_b, self.reverse_compensation_variant_b),
            (&mut toggles.allow_reverse_neutralization, self.allow_reverse_neutralization),
            (&mut toggles.use_da_price_as_customer_price, self.use_da_price_as_customer_price),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Resolve parameter inputs from every source and check them.
///
/// Validation warnings are logged; any error aborts before warnings are shown.
pub fn resolve_inputs(args: &ParamArgs) -> Result<ParameterInputs> {
    let mut inputs = match parameter_source(args) {
        Some(path) => {
            debug!(path = %path.display(), "using parameter file");
            load_parameters(&path)?
        }
        None => ParameterInputs::default(),
    };
    args.apply_overrides(&mut inputs);

    let diag = inputs.validate_strict().context("invalid parameters")?;
    for issue in diag.warnings() {
        warn!("{issue}");
    }
    Ok(inputs)
}

/// Write data as JSON to the given writer.
pub fn write_json<W: Write, T: Serialize>(
    data: &T,
    writer: &mut W,
    pretty: bool,
) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, data).map_err(io::Error::other)?;
    } else {
        serde_json::to_writer(&mut *writer, data).map_err(io::Error::other)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write data as JSON Lines (one JSON object per line) to the given writer.
pub fn write_jsonl<W: Write, T: Serialize>(data: &[T], writer: &mut W) -> io::Result<()> {
    for item in data {
        serde_json::to_writer(&mut *writer, item).map_err(io::Error::other)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Write a table aligned for people: field column, one column per variant,
/// unit column. Values use the unit's display decimals.
pub fn write_table_text<W: Write>(table: &Table, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} ({})", table.title(), table.key())?;
    let mut tw = TabWriter::new(&mut *writer).padding(2);

    let variants: Vec<String> = table.variants().map(|v| v.to_string()).collect();
    writeln!(tw, "Field\t{}\tUnit", variants.join("\t"))?;
    for (idx, field) in table.fields().iter().enumerate() {
        let cells: Vec<String> = table
            .row_at(idx)
            .into_iter()
            .map(|(_, figure)| figure.format(field.unit.display_decimals()))
            .collect();
        writeln!(tw, "{}\t{}\t{}", field.name, cells.join("\t"), field.unit)?;
    }
    tw.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flex_core::{ParameterSet, TradeDirection};
    use flex_settlement::SettlementTables;

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let args = ParamArgs {
            v_da: Some(50.0),
            trade: Some(TradeDirection::Sell),
            p_recomp: Some(2.0),
            apply_deviation_penalty: Some(false),
            ..ParamArgs::default()
        };
        let mut inputs = ParameterInputs::default();
        args.apply_overrides(&mut inputs);
        assert_eq!(inputs.v_da, 50.0);
        assert_eq!(inputs.trade_direction, TradeDirection::Sell);
        assert_eq!(inputs.p_recomp, Some(2.0));
        assert_eq!(inputs.p_comp, None);
        assert_eq!(inputs.e_bud, 10.0);
        assert!(!inputs.toggles.apply_deviation_penalty);
        assert!(inputs.toggles.brp_forwards_imbalance_cost);
    }

    #[test]
    fn test_explicit_params_flag_wins() {
        let args = ParamArgs {
            params: Some(PathBuf::from("explicit.toml")),
            ..ParamArgs::default()
        };
        assert_eq!(parameter_source(&args), Some(PathBuf::from("explicit.toml")));
    }

    #[test]
    fn test_text_table_formatting() {
        let tables = SettlementTables::from_parameters(&ParameterSet::default());
        let mut output = Vec::new();
        write_table_text(&tables.summary, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Actor results and goal comparison (summary)"));
        let total = text
            .lines()
            .find(|l| l.starts_with("BRP+BSP+Retailer result"))
            .unwrap();
        assert!(total.contains("142"));
        assert!(total.contains("NA"));
        assert!(total.trim_end().ends_with("EUR"));
    }

    #[test]
    fn test_write_jsonl_to_string() {
        let data = vec![serde_json::json!({"id": 1}), serde_json::json!({"id": 2})];
        let mut output = Vec::new();
        write_jsonl(&data, &mut output).unwrap();
        let result = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = result.trim().lines().collect();
        assert_eq!(lines.len(), 2);
    }
}
