use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

use flex_cli::cli::{Cli, Commands};

mod commands;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run {
            params,
            table,
            format,
        } => commands::run::handle(params, *table, *format),
        Commands::Export {
            out_dir,
            params,
            format,
        } => commands::export::handle(out_dir, params, *format),
        Commands::Params { command } => commands::params::handle(command),
        Commands::Variants { format } => commands::variants::handle(*format),
        Commands::Completions { shell, out } => {
            commands::completions::handle(*shell, out.as_deref())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the tables; logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    debug!(command = ?cli.command, "starting flex-cli");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
