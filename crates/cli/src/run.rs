//! `statcheck run`: recompute the answers and print the validation report.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use statcheck_recon::report::write_text;
use statcheck_recon::{AnswerKey, CsvTables, TableSource, ValidatorConfig};

use crate::CliError;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// TOML config file (data paths, tolerance, answer key)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding players.csv and team_totals.csv
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Per-player CSV (overrides --data-dir and config)
    #[arg(long)]
    pub players: Option<PathBuf>,

    /// Team totals CSV (overrides --data-dir and config)
    #[arg(long)]
    pub team_totals: Option<PathBuf>,

    /// Absolute tolerance for numeric comparisons
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Compare player-name lines by name instead of numerically
    #[arg(long)]
    pub match_names: bool,

    /// Print the result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit 1 when any report line fails
    #[arg(long)]
    pub strict: bool,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (mut config, base_dir) = load_config(args.config.as_deref())?;

    if let Some(tolerance) = args.tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CliError::usage(format!(
                "--tolerance must be a finite non-negative number, got {tolerance}"
            )));
        }
        config.tolerance.absolute = tolerance;
    }
    if args.match_names {
        config.compare.match_names = true;
    }

    let key = load_answer_key(&config, &base_dir)?;

    let mut source = match args.data_dir {
        Some(ref dir) => CsvTables::in_dir(dir),
        None => config.tables(&base_dir),
    };
    if let Some(players) = args.players {
        source.players = players;
    }
    if let Some(team_totals) = args.team_totals {
        source.team_totals = team_totals;
    }

    let tables = source.load().map_err(|e| {
        let err = CliError::recon(e);
        if args.data_dir.is_none() && args.config.is_none() {
            err.with_hint("expected data/players.csv and data/team_totals.csv; use --data-dir to point elsewhere")
        } else {
            err
        }
    })?;

    let result = statcheck_recon::run(&config.comparator(), &key, &tables);

    // Output
    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::write(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::write(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    if !args.json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_text(&mut out, &result.results)
            .and_then(|()| out.flush())
            .map_err(|e| CliError::write(format!("cannot write report: {e}")))?;
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} checks, {} passed, {} failed, {} skipped",
        s.checks_run, s.passed, s.failed, s.checks_skipped,
    );
    for skipped in &result.skipped {
        log::info!("{} skipped: {}", skipped.check, skipped.reason);
    }

    if args.strict && s.failed > 0 {
        return Err(CliError::checks_failed(s.failed));
    }

    Ok(())
}

/// Read the config file if one was given. Returns the config and the
/// directory its relative paths resolve against.
pub(crate) fn load_config(path: Option<&Path>) -> Result<(ValidatorConfig, PathBuf), CliError> {
    let Some(path) = path else {
        return Ok((ValidatorConfig::default(), PathBuf::from(".")));
    };

    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read config {}: {e}", path.display())))?;
    let config = ValidatorConfig::from_toml(&config_str).map_err(CliError::recon)?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

/// The config's replacement key if it names one, else the built-in key.
pub(crate) fn load_answer_key(config: &ValidatorConfig, base_dir: &Path) -> Result<AnswerKey, CliError> {
    let Some(path) = config.answer_key_path(base_dir) else {
        return AnswerKey::builtin().map_err(CliError::recon);
    };

    let key_str = std::fs::read_to_string(&path)
        .map_err(|e| CliError::config(format!("cannot read answer key {}: {e}", path.display())))?;
    AnswerKey::from_toml(&key_str)
        .map_err(|e| CliError::recon(e).with_hint(format!("in {}", path.display())))
}
