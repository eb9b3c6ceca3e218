// statcheck - recompute the season Q&A answers and check them against the key

mod exit_codes;
mod key;
mod logging;
mod run;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{
    EXIT_CHECKS_FAILED, EXIT_INVALID_CONFIG, EXIT_LOAD_FAILED, EXIT_SUCCESS, EXIT_USAGE,
    EXIT_WRITE_FAILED,
};
use run::RunArgs;

#[derive(Parser)]
#[command(name = "statcheck")]
#[command(about = "Validate the season statistics answer key against the player and team tables")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute every answer and print the validation report
    #[command(after_help = "\
Examples:
  statcheck run
  statcheck run --data-dir season-2024/
  statcheck run --config statcheck.toml --json
  statcheck run --tolerance 0.1 --strict
  statcheck run --match-names --output report.json")]
    Run(RunArgs),

    /// Print the answer key in effect
    #[command(after_help = "\
Examples:
  statcheck key
  statcheck key --json
  statcheck key --config statcheck.toml")]
    Key {
        /// Config file naming a replacement answer key
        #[arg(long, short = 'c')]
        config: Option<std::path::PathBuf>,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  statcheck-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        // No subcommand = run with defaults
        None => run::cmd_run(RunArgs::default()),
        Some(Commands::Run(args)) => run::cmd_run(args),
        Some(Commands::Key { config, json }) => key::cmd_key(config, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self { code: EXIT_LOAD_FAILED, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE_FAILED, message: msg.into(), hint: None }
    }

    pub fn checks_failed(failed: usize) -> Self {
        Self {
            code: EXIT_CHECKS_FAILED,
            message: format!("{failed} report line(s) failed"),
            hint: None,
        }
    }

    /// Map an engine error: load failures get their own code, everything
    /// else is a config or answer-key problem.
    pub fn recon(err: statcheck_recon::ReconError) -> Self {
        if err.is_load_failure() {
            Self::load(err.to_string())
        } else {
            Self::config(err.to_string())
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
