use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;
use crate::loader::CsvTables;
use crate::metrics::{Comparator, DEFAULT_TOLERANCE};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Replacement answer key (TOML). The built-in key is used when absent.
    #[serde(default)]
    pub answer_key: Option<String>,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub compare: CompareConfig,
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default = "default_players")]
    pub players: String,
    #[serde(default = "default_team_totals")]
    pub team_totals: String,
}

fn default_players() -> String {
    "data/players.csv".into()
}

fn default_team_totals() -> String {
    "data/team_totals.csv".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            team_totals: default_team_totals(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance + Compare
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    #[serde(default = "default_tolerance")]
    pub absolute: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            absolute: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Compare player-name lines by normalized name instead of numerically.
    #[serde(default)]
    pub match_names: bool,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ValidatorConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ValidatorConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let tol = self.tolerance.absolute;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.absolute must be a finite non-negative number, got {tol}"
            )));
        }

        if self.data.players.trim().is_empty() {
            return Err(ReconError::ConfigValidation("data.players is empty".into()));
        }
        if self.data.team_totals.trim().is_empty() {
            return Err(ReconError::ConfigValidation("data.team_totals is empty".into()));
        }
        if matches!(self.answer_key.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("answer_key is empty".into()));
        }

        Ok(())
    }

    pub fn comparator(&self) -> Comparator {
        Comparator {
            tolerance: self.tolerance.absolute,
            match_names: self.compare.match_names,
        }
    }

    /// Input tables, with relative paths resolved against `base_dir`.
    pub fn tables(&self, base_dir: &Path) -> CsvTables {
        CsvTables::new(
            resolve(base_dir, &self.data.players),
            resolve(base_dir, &self.data.team_totals),
        )
    }

    pub fn answer_key_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.answer_key.as_deref().map(|p| resolve(base_dir, p))
    }
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
