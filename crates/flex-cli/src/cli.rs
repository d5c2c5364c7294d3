use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use flex_core::{FlexError, TradeDirection};
use flex_settlement::TableKind;
use std::path::PathBuf;
use std::str::FromStr;

use crate::common::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "flex-cli", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Settle all variants and print the result tables
    Run {
        #[command(flatten)]
        params: ParamArgs,
        /// Table to print (brp, bsp, retailer, summary, customer_price, neutralization or all)
        #[arg(long, default_value = "all")]
        table: TableSelection,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Write every result table to a directory
    Export {
        /// Output directory
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// File format of the written tables
        #[arg(long, value_enum, default_value_t)]
        format: ExportFormatArg,
    },
    /// Parameter file helpers
    Params {
        #[command(subcommand)]
        command: ParamsCommands,
    },
    /// List the scenario variants and their bindings
    Variants {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ParamsCommands {
    /// Write a parameter file holding the defaults
    Template {
        /// Destination file (prints to stdout when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Check a parameter file and report issues
    Validate {
        /// Parameter file (TOML, YAML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Print the effective parameters after all sources and overrides
    Show {
        #[command(flatten)]
        params: ParamArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: ParamsFormat,
    },
}

/// Parameter source and per-value overrides shared by the computing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Parameter file (TOML, YAML or JSON); falls back to $FLEX_PARAMS
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub params: Option<PathBuf>,

    /// Day-ahead traded volume (MWh)
    #[arg(long)]
    pub v_da: Option<f64>,
    /// Whether the day-ahead volume was bought or sold
    #[arg(long, value_name = "buy|sell")]
    pub trade: Option<TradeDirection>,
    /// Measured consumption (MWh)
    #[arg(long)]
    pub e_cons: Option<f64>,
    /// Bid size (MWh)
    #[arg(long)]
    pub e_bud: Option<f64>,
    /// Measured activation (MWh)
    #[arg(long)]
    pub e_akt: Option<f64>,
    /// Day-ahead price (EUR/MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub p_da: Option<f64>,
    /// Imbalance price (EUR/MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub p_imb: Option<f64>,
    /// BSP compensation price (EUR/MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub p_comp: Option<f64>,
    /// BSP deviation-penalty price (EUR/MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub p_pen: Option<f64>,
    /// Retailer compensation price (EUR/MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub p_recomp: Option<f64>,

    /// BRP invoices its imbalance cost to the retailer
    #[arg(long, value_name = "BOOL")]
    pub brp_forwards_imbalance_cost: Option<bool>,
    /// Retailer passes the imbalance invoice to customers
    #[arg(long, value_name = "BOOL")]
    pub re_forwards_imbalance_cost: Option<bool>,
    /// Charge the BSP the penalty price for missing its bid
    #[arg(long, value_name = "BOOL")]
    pub apply_deviation_penalty: Option<bool>,
    /// BSP buys the activated volume day-ahead when regulating down
    #[arg(long, value_name = "BOOL")]
    pub bsp_buys_on_downregulation: Option<bool>,
    /// Variant 5b: the retailer compensates the BSP
    #[arg(long, value_name = "BOOL")]
    pub reverse_compensation_variant_b: Option<bool>,
    /// Allow negative customer compensation
    #[arg(long, value_name = "BOOL")]
    pub allow_reverse_neutralization: Option<bool>,
    /// Bill customers at the day-ahead price
    #[arg(long, value_name = "BOOL")]
    pub use_da_price_as_customer_price: Option<bool>,
}

/// `all` or a single table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSelection {
    All,
    One(TableKind),
}

impl TableSelection {
    pub fn kinds(self) -> Vec<TableKind> {
        match self {
            TableSelection::All => TableKind::ALL.to_vec(),
            TableSelection::One(kind) => vec![kind],
        }
    }
}

impl FromStr for TableSelection {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TableSelection::All)
        } else {
            s.parse().map(TableSelection::One)
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormatArg {
    /// One spreadsheet-style CSV file per table
    #[default]
    Csv,
    /// One JSON document per table
    Json,
}

impl From<ExportFormatArg> for flex_io::ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => flex_io::ExportFormat::Csv,
            ExportFormatArg::Json => flex_io::ExportFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParamsFormat {
    #[default]
    Toml,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
