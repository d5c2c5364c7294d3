use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};

use flex_cli::cli::build_cli_command;

pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    let bin_name = cmd.get_name().to_string();

    let mut sink: Box<dyn Write> = match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory '{}'", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating completion file '{}'", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };
    generate(shell, &mut cmd, bin_name, &mut sink);
    sink.flush()?;

    if let Some(path) = out {
        eprintln!("Wrote {shell} completion to {}", path.display());
    }
    Ok(())
}
