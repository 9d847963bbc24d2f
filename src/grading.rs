// src/grading.rs

use crate::models::{Challenge, TestResult, Verdict};
use log::debug;

/// Grades a submission against its challenge.
///
/// Challenges with declared tests pass when every test passes: a test with
/// expected output requires that text in the captured console output; a
/// test without one falls back to the challenge's keyed heuristic. With no
/// declared tests the keyed heuristic alone decides.
pub fn validate_challenge(challenge: &Challenge, code: &str, console_output: &[String]) -> Verdict {
    let heuristic = heuristic_pass(&challenge.id, code, console_output);

    let results: Vec<TestResult> = challenge
        .tests
        .iter()
        .map(|test| TestResult {
            description: test.description.clone(),
            passed: if test.expected_output.is_empty() {
                heuristic
            } else {
                output_contains(console_output, &test.expected_output)
            },
        })
        .collect();

    let accepted = if results.is_empty() {
        heuristic
    } else {
        results.iter().all(|r| r.passed)
    };

    let feedback = if accepted {
        "All checks passed.".to_string()
    } else if results.is_empty() {
        "The solution does not look right yet. Check the hints and try again.".to_string()
    } else {
        let passed = results.iter().filter(|r| r.passed).count();
        format!("{passed}/{} checks passed.", results.len())
    };

    debug!(
        "Grading {}: accepted={accepted} ({} tests)",
        challenge.id,
        results.len()
    );

    Verdict {
        accepted,
        results,
        feedback,
    }
}

// Per-challenge acceptance heuristics, keyed by challenge id. These are
// substring checks against the captured output or the submitted source;
// unknown ids are accepted unconditionally.
fn heuristic_pass(challenge_id: &str, code: &str, output: &[String]) -> bool {
    match challenge_id {
        "singleton-basics" => code.contains("getInstance"),
        "singleton-debug" => output_contains(output, "true"),
        "singleton-lazy" => code.contains("getInstance") && output_contains(output, "1"),
        "builder-fluent" => code.contains("return this"),
        "factory-shapes" => {
            output_contains(output, "circle") || output_contains(output, "Circle")
        }
        "observer-subscribe" => output_contains(output, "notified"),
        "decorator-coffee" => output_contains(output, "cost"),
        "strategy-sorting" => code.contains("sort"),
        _ => true,
    }
}

fn output_contains(output: &[String], needle: &str) -> bool {
    output.iter().any(|line| line.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChallengeTest;

    fn challenge(id: &str, tests: Vec<ChallengeTest>) -> Challenge {
        Challenge {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            difficulty: "Easy".to_string(),
            points: 100,
            starter_code: String::new(),
            hints: Vec::new(),
            tests,
        }
    }

    fn test(description: &str, expected: &str) -> ChallengeTest {
        ChallengeTest {
            description: description.to_string(),
            expected_output: expected.to_string(),
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_id_without_tests_is_accepted() {
        let verdict = validate_challenge(&challenge("mystery-1", vec![]), "anything", &[]);
        assert!(verdict.accepted);
        assert!(verdict.results.is_empty());
    }

    #[test]
    fn expected_output_must_appear() {
        let c = challenge(
            "mystery-2",
            vec![test("prints the total", "total: 42")],
        );

        let ok = validate_challenge(&c, "", &lines(&["total: 42"]));
        assert!(ok.accepted);
        assert!(ok.results[0].passed);

        let bad = validate_challenge(&c, "", &lines(&["total: 7"]));
        assert!(!bad.accepted);
        assert_eq!(bad.feedback, "0/1 checks passed.");
    }

    #[test]
    fn all_tests_must_pass() {
        let c = challenge(
            "mystery-3",
            vec![test("first", "alpha"), test("second", "beta")],
        );
        let verdict = validate_challenge(&c, "", &lines(&["alpha"]));
        assert!(!verdict.accepted);
        assert!(verdict.results[0].passed);
        assert!(!verdict.results[1].passed);
    }

    #[test]
    fn empty_expectation_defers_to_heuristic() {
        let c = challenge("builder-fluent", vec![test("chainable calls", "")]);

        let ok = validate_challenge(&c, "setName(n) { this.n = n; return this; }", &[]);
        assert!(ok.accepted);

        let bad = validate_challenge(&c, "setName(n) { this.n = n; }", &[]);
        assert!(!bad.accepted);
    }

    #[test]
    fn source_keyed_heuristic_without_tests() {
        let c = challenge("singleton-basics", vec![]);
        assert!(validate_challenge(&c, "Config.getInstance()", &[]).accepted);
        assert!(!validate_challenge(&c, "new Config()", &[]).accepted);
    }

    #[test]
    fn output_keyed_heuristic_without_tests() {
        let c = challenge("singleton-debug", vec![]);
        assert!(validate_challenge(&c, "", &lines(&["a === b: true"])).accepted);
        assert!(!validate_challenge(&c, "", &lines(&["a === b: false"])).accepted);
    }
}
