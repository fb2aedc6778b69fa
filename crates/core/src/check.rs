//! Pass/fail bookkeeping for seeding and verification runs.
//!
//! Each item is recorded independently: a failure is logged and counted and
//! the run carries on. The report maps to a process exit code at the end.

use serde::Serialize;

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CheckOutcome {
    Passed { name: String },
    Failed { name: String, message: String },
}

impl CheckOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Passed { name } | Self::Failed { name, .. } => name,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// Accumulated results of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::info!(check = %name, "PASS");
        self.passed += 1;
        self.outcomes.push(CheckOutcome::Passed { name });
    }

    pub fn fail(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let name = name.into();
        let message = message.into();
        tracing::warn!(check = %name, %message, "FAIL");
        self.failed += 1;
        self.outcomes.push(CheckOutcome::Failed { name, message });
    }

    /// Record a result, turning any error into a failure message.
    pub fn record<T, E: std::fmt::Display>(
        &mut self,
        name: impl Into<String>,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                self.pass(name);
                Some(value)
            }
            Err(e) => {
                self.fail(name, e.to_string());
                None
            }
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: CheckReport) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.outcomes.extend(other.outcomes);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// `0` when nothing failed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.is_passed())
    }

    /// One-line summary such as `"7 passed, 1 failed (8 total)"`.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed ({} total)",
            self.passed,
            self.failed,
            self.total()
        )
    }
}
