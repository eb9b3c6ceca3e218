//! `statcheck-recon`: Answer-key validator for season lacrosse statistics.
//!
//! Loads the player and team-total tables, derives the columns the questions
//! need, recomputes every answer and compares it against the key within an
//! absolute tolerance. Rendering and exit policy belong to the CLI.

pub mod answer_key;
pub mod checks;
pub mod config;
pub mod derived;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod report;

pub use answer_key::AnswerKey;
pub use config::ValidatorConfig;
pub use derived::Tables;
pub use engine::run;
pub use error::ReconError;
pub use loader::{CsvTables, TableSource};
pub use metrics::Comparator;
pub use model::{CheckResult, Status, ValidationResult, Value};
