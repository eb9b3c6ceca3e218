use crate::answer_key::AnswerKey;
use crate::checks::{Check, BATTERY};
use crate::derived::Tables;
use crate::evidence::compute_summary;
use crate::metrics::{delta, Comparator};
use crate::model::{CheckResult, RunMeta, SkippedCheck, ValidationResult};

/// Run the check battery over derived tables. Never fails: a check that cannot
/// be evaluated is skipped, and an uncomputable value is a FAIL line.
pub fn run(comparator: &Comparator, key: &AnswerKey, tables: &Tables) -> ValidationResult {
    run_checks(&BATTERY, comparator, key, tables)
}

/// Run an explicit list of checks, in order.
pub fn run_checks(
    checks: &[Check],
    comparator: &Comparator,
    key: &AnswerKey,
    tables: &Tables,
) -> ValidationResult {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for check in checks {
        let missing = check.missing_columns(tables);
        if !missing.is_empty() {
            let reason = format!("missing column(s): {}", missing.join(", "));
            log::debug!("{} skipped ({}): {reason}", check.id, check.title);
            skipped.push(SkippedCheck { check: check.id, reason });
            continue;
        }

        let observations = match (check.compute)(tables, &key.subjects) {
            Some(obs) if !obs.is_empty() => obs,
            _ => {
                let reason = "subject or value not found".to_string();
                log::debug!("{} skipped ({}): {reason}", check.id, check.title);
                skipped.push(SkippedCheck { check: check.id, reason });
                continue;
            }
        };

        for obs in observations {
            let expected = key.expected(obs.label);
            results.push(CheckResult {
                check: check.id,
                label: obs.label.to_string(),
                delta: delta(&expected, &obs.actual),
                status: comparator.verdict(&expected, &obs.actual),
                expected,
                actual: obs.actual,
            });
        }
    }

    let summary = compute_summary(checks.len(), &results, &skipped);

    ValidationResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            tolerance: comparator.tolerance,
            match_names: comparator.match_names,
        },
        summary,
        results,
        skipped,
    }
}
