//! Outcome of a verification run

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one scenario, teardown included
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    /// Violation raised by the scenario, then any raised by its teardown
    pub violations: Vec<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub base_url: String,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            base_url: base_url.into(),
            scenarios: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.scenarios.push(outcome);
    }

    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|outcome| outcome.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.scenarios.iter().find(|outcome| outcome.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "session protocol verification against {}", self.base_url)?;

        for outcome in &self.scenarios {
            let mark = if outcome.passed { "PASS" } else { "FAIL" };
            writeln!(f, "  {} {} ({} ms)", mark, outcome.name, outcome.duration_ms)?;

            for violation in &outcome.violations {
                writeln!(f, "       {}", violation)?;
            }
        }

        write!(
            f,
            "{} passed, {} failed, {} total",
            self.passed(),
            self.failed(),
            self.scenarios.len()
        )
    }
}
