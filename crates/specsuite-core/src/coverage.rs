//! Coverage summary over a built test plan
//!
//! Pure aggregation: no I/O, no mutation of the plan.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::plan::TestGroup;

/// An operation that produced no cases, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedOperation {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    pub reason: String,
}

/// Coverage of declared operations by generated cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageReport {
    /// Every operation declared in the document (including skipped ones)
    pub operations_total: usize,
    /// Distinct operations with at least one case
    pub operations_covered: usize,
    /// Number of cases in the plan
    pub total_tests: usize,
    /// `round(covered / total * 100)`, 0 for an empty document
    pub coverage_percentage: u32,
    #[serde(default)]
    pub skipped: Vec<SkippedOperation>,
}

/// Summarize grouped cases against the number of declared operations.
#[must_use]
pub fn summarize(
    groups: &[TestGroup],
    operations_total: usize,
    skipped: Vec<SkippedOperation>,
) -> CoverageReport {
    let covered: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.cases.iter())
        .map(|c| c.operation_id.as_str())
        .collect();
    let total_tests = groups.iter().map(|g| g.cases.len()).sum();

    CoverageReport {
        operations_total,
        operations_covered: covered.len(),
        total_tests,
        coverage_percentage: percentage(covered.len(), operations_total),
        skipped,
    }
}

/// Rounded percentage (half away from zero) in integer arithmetic.
#[must_use]
pub fn percentage(covered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let covered = covered as u64;
    let total = total as u64;
    let pct = (covered * 200 + total) / (total * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

impl CoverageReport {
    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = vec![format!(
            "Coverage: {}/{} operations ({}%), {} tests",
            self.operations_covered,
            self.operations_total,
            self.coverage_percentage,
            self.total_tests,
        )];

        if !self.skipped.is_empty() {
            lines.push(format!("Skipped ({}):", self.skipped.len()));
            for s in &self.skipped {
                lines.push(format!(
                    "  {} {} {}: {}",
                    s.operation_id, s.method, s.path, s.reason
                ));
            }
        }

        lines.join("\n")
    }
}
