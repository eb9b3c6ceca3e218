//! `statcheck key`: print the answer key in effect.

use std::path::PathBuf;

use statcheck_recon::AnswerKey;

use crate::run::{load_answer_key, load_config};
use crate::CliError;

pub fn cmd_key(config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let (config, base_dir) = load_config(config.as_deref())?;
    let key = load_answer_key(&config, &base_dir)?;

    let rendered = if json { key_json(&key)? } else { key.to_toml().map_err(CliError::recon)? };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn key_json(key: &AnswerKey) -> Result<String, CliError> {
    let mut expected = serde_json::Map::new();
    for (label, value) in key.entries() {
        let value = serde_json::to_value(value)
            .map_err(|e| CliError::write(format!("JSON serialization error: {e}")))?;
        expected.insert(label.to_string(), value);
    }
    let subjects = serde_json::to_value(&key.subjects)
        .map_err(|e| CliError::write(format!("JSON serialization error: {e}")))?;

    serde_json::to_string_pretty(&serde_json::json!({
        "subjects": subjects,
        "expected": expected,
    }))
    .map_err(|e| CliError::write(format!("JSON serialization error: {e}")))
}
