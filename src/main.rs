use std::process::ExitCode;

use clap::{Parser, Subcommand};

use javlabot::commands::check::CheckArgs;
use javlabot::commands::run::RunArgs;
use javlabot::{commands, error, telemetry};

#[derive(Debug, Parser)]
#[command(
    name = "javlabot",
    version,
    about = "An IRC bot that swears at people in Swedish when they talk too much"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Connect to the server and start counting
    Run(RunArgs),
    /// Validate the config and print the effective settings
    Check(CheckArgs),
    /// Print the JSON Schema for javlabot.toml
    Schema,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Run(_) => "run",
            Self::Check(_) => "check",
            Self::Schema => "schema",
        }
    }
}

fn main() -> ExitCode {
    let _telemetry = telemetry::init();

    let cli = Cli::parse();

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Run(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Schema => commands::schema::run_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit_err) = e.downcast_ref::<error::ExitError>() {
                eprintln!("error: {exit_err}");
                exit_err.exit_code()
            } else {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}
