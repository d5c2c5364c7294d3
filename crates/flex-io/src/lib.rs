//! # flex-io: Parameter Files and Table Export
//!
//! - [`params`] loads [`ParameterInputs`](flex_core::ParameterInputs) from
//!   TOML, YAML or JSON and writes the default template.
//! - [`csv_table`] writes and reads the spreadsheet-style CSV layout.
//! - [`export`] writes all settlement tables to a directory as CSV or JSON.

pub mod csv_table;
pub mod export;
pub mod params;

pub use csv_table::{read_table_csv, read_table_csv_from, write_table_csv, write_table_csv_to};
pub use export::{export_tables, write_table_json, ExportFormat};
pub use params::{
    load_parameters, parameter_template, parameters_to_toml, parse_parameters,
    write_parameter_template, ParamFormat,
};
