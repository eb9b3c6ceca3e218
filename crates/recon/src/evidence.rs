use crate::model::{CheckResult, SkippedCheck, Status, ValidationSummary};

/// Compute summary statistics from report lines and skipped checks.
pub fn compute_summary(
    checks_total: usize,
    results: &[CheckResult],
    skipped: &[SkippedCheck],
) -> ValidationSummary {
    let mut passed = 0;
    let mut failed = 0;

    for r in results {
        match r.status {
            Status::Pass => passed += 1,
            Status::Fail => failed += 1,
        }
    }

    ValidationSummary {
        checks_run: checks_total.saturating_sub(skipped.len()),
        checks_skipped: skipped.len(),
        total: results.len(),
        passed,
        failed,
    }
}
