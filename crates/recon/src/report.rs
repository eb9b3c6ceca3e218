// Text report rendering. Pure formatting: no computation happens here.

use std::fmt::Write as _;
use std::io;

use crate::model::CheckResult;

pub const REPORT_HEADER: &str = "=== VALIDATION REPORT ===";
pub const REPORT_FOOTER: &str = "=========================";

/// One report line: `<Label>: expected=<value>, got=<value> --> PASS|FAIL`.
pub fn format_line(result: &CheckResult) -> String {
    format!(
        "{}: expected={}, got={} --> {}",
        result.label, result.expected, result.actual, result.status
    )
}

/// Full report, banner lines included, newline-terminated.
pub fn render_text(results: &[CheckResult]) -> String {
    let mut out = String::new();
    out.push_str(REPORT_HEADER);
    out.push('\n');
    for r in results {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", format_line(r));
    }
    out.push_str(REPORT_FOOTER);
    out.push('\n');
    out
}

pub fn write_text(w: &mut impl io::Write, results: &[CheckResult]) -> io::Result<()> {
    w.write_all(render_text(results).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CheckId, Status, Value};

    fn line(label: &str, expected: Value, actual: Value, status: Status) -> CheckResult {
        CheckResult {
            check: CheckId(1),
            label: label.into(),
            expected,
            actual,
            delta: None,
            status,
        }
    }

    #[test]
    fn formats_lines() {
        let r = line("Q2 ExtraGoals", Value::Int(6), Value::Int(6), Status::Pass);
        assert_eq!(format_line(&r), "Q2 ExtraGoals: expected=6, got=6 --> PASS");

        let r = line("Q10 NS goals per SOG %", Value::Float(60.0), Value::Undefined, Status::Fail);
        assert_eq!(format_line(&r), "Q10 NS goals per SOG %: expected=60.0, got=nan --> FAIL");
    }

    #[test]
    fn renders_banners() {
        let results = vec![line(
            "Q1 Player",
            Value::from("Natalie Smith"),
            Value::from("Natalie Smith"),
            Status::Fail,
        )];
        assert_eq!(
            render_text(&results),
            "=== VALIDATION REPORT ===\n\
             Q1 Player: expected=Natalie Smith, got=Natalie Smith --> FAIL\n\
             =========================\n"
        );
    }

    #[test]
    fn empty_report_still_has_banners() {
        assert_eq!(render_text(&[]), format!("{REPORT_HEADER}\n{REPORT_FOOTER}\n"));
    }

    #[test]
    fn write_text_matches_render() {
        let mut buf = Vec::new();
        write_text(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render_text(&[]));
    }
}
