// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Text rendering of bridge results for a terminal front end.

use std::fmt::Write;

use crate::bridge::puzzle::{Outcome, PuzzleResult};
use crate::errors::BridgeError;
use crate::testcases::TestcaseReport;

pub const NOT_COMPUTED: &str = "Not computed";

/// The text shown in a part's output slot.
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::NotComputed => NOT_COMPUTED.to_string(),
        Outcome::Solved(text) if text.is_empty() => NOT_COMPUTED.to_string(),
        Outcome::Solved(text) => text.clone(),
        Outcome::Failed(error) => format!("error: {}", error),
    }
}

/// `Part N: <text>`; multi-line answers continue on the following lines.
pub fn render_result(result: &PuzzleResult) -> String {
    format!("{}: {}", result.part, render_outcome(&result.outcome))
}

/// One block per part, each followed by its elapsed time.
pub fn render_results(results: &[PuzzleResult]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "{}", render_result(result));
        let _ = writeln!(out, "   ⏱️  {:?}", result.elapsed);
    }
    out
}

/// Notice for a request that failed before any part ran.
pub fn render_failure(error: &BridgeError) -> String {
    format!("❌ Could not solve puzzle: {}", error)
}

/// One line per test case.
pub fn render_report(report: &TestcaseReport) -> String {
    let marker = if report.passed { "✅" } else { "❌" };
    let case = &report.testcase;
    match &report.result {
        Ok(result) if report.passed => format!(
            "{} Day {:02} Part {}: {} ({:?})",
            marker,
            case.day,
            case.part,
            case.solution.trim(),
            result.elapsed
        ),
        Ok(result) => format!(
            "{} Day {:02} Part {}: expected {}, got {}",
            marker,
            case.day,
            case.part,
            case.solution.trim(),
            render_outcome(&result.outcome)
        ),
        Err(e) => format!("{} Day {:02} Part {}: {}", marker, case.day, case.part, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::puzzle::Part;
    use crate::testcases::Testcase;
    use std::time::Duration;

    fn result(part: Part, outcome: Outcome) -> PuzzleResult {
        PuzzleResult {
            part,
            outcome,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_render_each_outcome() {
        assert_eq!(
            render_result(&result(Part::First, Outcome::Solved("1234".into()))),
            "Part 1: 1234"
        );
        assert_eq!(
            render_result(&result(Part::Second, Outcome::Failed("parse failure".into()))),
            "Part 2: error: parse failure"
        );
        assert_eq!(
            render_result(&result(Part::First, Outcome::NotComputed)),
            "Part 1: Not computed"
        );
    }

    #[test]
    fn test_empty_answer_renders_as_not_computed() {
        assert_eq!(
            render_result(&result(Part::Second, Outcome::Solved(String::new()))),
            "Part 2: Not computed"
        );
    }

    #[test]
    fn test_render_results_keeps_part_order() {
        let rendered = render_results(&[
            result(Part::First, Outcome::Solved("a".into())),
            result(Part::Second, Outcome::Solved("b".into())),
        ]);
        let first = rendered.find("Part 1: a").unwrap();
        let second = rendered.find("Part 2: b").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_failure() {
        let rendered = render_failure(&BridgeError::InvalidPuzzle(26));
        assert!(rendered.contains("26"));
    }

    #[test]
    fn test_render_report() {
        let testcase = Testcase {
            day: 1,
            part: 2,
            solution: "31\n".into(),
            input: "3 4".into(),
        };
        let passed = TestcaseReport::new(
            testcase.clone(),
            Ok(result(Part::Second, Outcome::Solved("31".into()))),
        );
        assert!(render_report(&passed).starts_with("✅ Day 01 Part 2: 31"));

        let failed = TestcaseReport::new(
            testcase,
            Ok(result(Part::Second, Outcome::Failed("boom".into()))),
        );
        assert_eq!(
            render_report(&failed),
            "❌ Day 01 Part 2: expected 31, got error: boom"
        );
    }
}
