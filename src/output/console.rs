use crate::package::{CheckReport, CheckStatus};

use super::StatusReport;

/// Render pet status as plain text.
pub fn render_status(report: &StatusReport) -> String {
    let s = &report.state;
    let mut output = String::new();

    output.push_str("Pet status:\n");
    output.push_str(&format!("  Mood:   {}\n", s.mood));
    output.push_str(&format!("  Energy: {}\n", s.energy));
    output.push_str(&format!("  XP:     {}\n", s.xp));
    output.push_str(&format!("  Level:  {}\n", s.level));

    if !report.persisted {
        output.push_str("  (a brand new pet; no saved state yet)\n");
    }
    if let Some(event) = report.last_event {
        output.push_str(&format!("  Last event: {}\n", event));
    }
    if let Some(at) = report.updated_at {
        output.push_str(&format!(
            "  Updated:    {}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}

/// Render a package check report, one line per check, then the verdict.
pub fn render_check_report(report: &CheckReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n  {} {} package checks:\n\n",
        report.package, report.version
    ));

    for result in &report.results {
        let tag = match result.status {
            CheckStatus::Pass => "[PASS]",
            CheckStatus::Fail => "[FAIL]",
            CheckStatus::Skipped => "[SKIP]",
        };
        output.push_str(&format!(
            "  {} {} {:<28} {}\n",
            tag, result.id, result.name, result.message
        ));
    }

    let status = if report.verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "\n  Result: {} ({} passed, {} failed, {} skipped)\n\n",
        status, report.verdict.passed, report.verdict.failed, report.verdict.skipped
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::test_support::descriptor_for;
    use crate::package::CheckEngine;
    use crate::pet::{Event, PetState};

    #[test]
    fn fresh_pet_is_labelled() {
        let report = StatusReport {
            state: PetState::new(),
            persisted: false,
            last_event: None,
            updated_at: None,
            state_file: "pet.json".into(),
        };
        let text = render_status(&report);
        assert!(text.contains("Mood:   neutral"));
        assert!(text.contains("brand new pet"));
    }

    #[test]
    fn last_event_is_shown() {
        let report = StatusReport {
            state: PetState::new(),
            persisted: true,
            last_event: Some(Event::BugFix),
            updated_at: None,
            state_file: "pet.json".into(),
        };
        assert!(render_status(&report).contains("Last event: bug-fix"));
    }

    #[test]
    fn check_report_lists_every_check() {
        let report = CheckEngine::new().run(&descriptor_for(b"x"), None);
        let text = render_check_report(&report);
        assert_eq!(text.matches("PKG-").count(), report.results.len());
        assert!(text.contains("[SKIP] PKG-005"));
        assert!(text.contains("Result: PASS"));
    }
}
