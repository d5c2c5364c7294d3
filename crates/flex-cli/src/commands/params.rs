use std::io;

use anyhow::{bail, Result};
use flex_io::{load_parameters, parameter_template, parameters_to_toml, write_parameter_template};
use tracing::info;

use flex_cli::cli::{ParamsCommands, ParamsFormat};
use flex_cli::common::{resolve_inputs, write_json};

pub fn handle(command: &ParamsCommands) -> Result<()> {
    match command {
        ParamsCommands::Template { out } => match out {
            Some(path) => {
                write_parameter_template(path)?;
                println!("Wrote parameter template to {}", path.display());
            }
            None => print!("{}", parameter_template()?),
        },
        ParamsCommands::Validate { file } => {
            let inputs = load_parameters(file)?;
            let diag = inputs.validate();
            for issue in &diag.issues {
                println!("{issue}");
            }
            println!("{}: {}", file.display(), diag.summary());
            if diag.has_errors() {
                bail!("parameter file '{}' is invalid", file.display());
            }
            info!(path = %file.display(), "parameter file is valid");
        }
        ParamsCommands::Show { params, format } => {
            let mut inputs = resolve_inputs(params)?;
            // show the derived consumption rather than leaving it implicit
            inputs.e_cons = Some(inputs.consumption());
            match format {
                ParamsFormat::Toml => print!("{}", parameters_to_toml(&inputs)?),
                ParamsFormat::Json => write_json(&inputs, &mut io::stdout(), true)?,
            }
        }
    }
    Ok(())
}
