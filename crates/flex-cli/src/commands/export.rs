use std::path::Path;

use anyhow::Result;
use flex_core::ParameterSet;
use flex_settlement::SettlementTables;

use flex_cli::cli::{ExportFormatArg, ParamArgs};
use flex_cli::common::resolve_inputs;

pub fn handle(out_dir: &Path, params: &ParamArgs, format: ExportFormatArg) -> Result<()> {
    let inputs = resolve_inputs(params)?;
    let tables = SettlementTables::from_parameters(&ParameterSet::resolve(&inputs));
    let written = flex_io::export_tables(&tables, out_dir, format.into())?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
