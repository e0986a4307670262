//! Test plan interchange types
//!
//! The framework-agnostic intermediate representation handed to emitters.
//! An emitter renders literal test source from these records without
//! re-deriving anything from the OpenAPI document.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageReport;

// ── Values ──

/// A synthesized value together with the schema node it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleValue {
    /// JSON-compatible value tree
    pub value: serde_json::Value,
    /// Provenance label: the `$ref` pointer of the source schema, or its kind
    /// (e.g. `string(email)`) for inline schemas
    pub origin: String,
}

impl ExampleValue {
    #[must_use]
    pub fn new(value: serde_json::Value, origin: impl Into<String>) -> Self {
        Self {
            value,
            origin: origin.into(),
        }
    }

    /// Render as a bare string, the way it appears in a URL or header.
    #[must_use]
    pub fn rendered(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A named parameter value (path, query, header or cookie).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParamValue {
    pub name: String,
    pub value: ExampleValue,
}

// ── Cases ──

/// Kind of generated test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// Schema-valid request, expects success
    Valid,
    /// Request with payload and parameters emptied, expects rejection
    InvalidEmpty,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::InvalidEmpty => write!(f, "invalid_empty"),
        }
    }
}

/// Status codes a test case accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    /// Exactly this status
    Exact(u16),
    /// Any one of these statuses
    OneOf(Vec<u16>),
}

impl ExpectedStatus {
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    #[must_use]
    pub fn codes(&self) -> Vec<u16> {
        match self {
            Self::Exact(code) => vec![*code],
            Self::OneOf(codes) => codes.clone(),
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::OneOf(codes) => {
                let list: Vec<String> = codes.iter().map(u16::to_string).collect();
                write!(f, "one of {}", list.join(", "))
            }
        }
    }
}

/// One row of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestCase {
    /// Identifier of the operation this case exercises
    pub operation_id: String,
    /// Upper-case HTTP method
    pub method: String,
    /// Path template with `{param}` placeholders
    pub path_template: String,
    /// Human-readable case name, stable across runs
    pub name: String,
    pub kind: CaseKind,
    /// Union member index when cases are generated per `oneOf`/`anyOf` variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<usize>,
    /// Path with placeholders substituted
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<ParamValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<ParamValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<ParamValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ExampleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub expected: ExpectedStatus,
}

impl TestCase {
    /// Operation label, e.g. "POST /users"
    #[must_use]
    pub fn operation_label(&self) -> String {
        format!("{} {}", self.method, self.path_template)
    }
}

/// Cases sharing one tag; emitters write one file per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestGroup {
    pub tag: String,
    pub cases: Vec<TestCase>,
}

/// Group `(tag, case)` pairs, keeping first-appearance order of tags and
/// input order of cases within a tag.
pub fn group_by_tag(cases: impl IntoIterator<Item = (String, TestCase)>) -> Vec<TestGroup> {
    let mut groups: Vec<TestGroup> = Vec::new();
    for (tag, case) in cases {
        match groups.iter_mut().find(|g| g.tag == tag) {
            Some(group) => group.cases.push(case),
            None => groups.push(TestGroup {
                tag,
                cases: vec![case],
            }),
        }
    }
    groups
}

// ── Plan ──

/// Complete plan: grouped cases plus the coverage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestPlan {
    /// `info.title` of the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Server base path (`servers[0].url` or Swagger `basePath`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub groups: Vec<TestGroup>,
    pub coverage: CoverageReport,
}

impl TestPlan {
    /// All cases in plan order.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.groups.iter().flat_map(|g| g.cases.iter())
    }

    #[must_use]
    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    /// Cases of one operation, in plan order.
    #[must_use]
    pub fn cases_for(&self, operation_id: &str) -> Vec<&TestCase> {
        self.cases()
            .filter(|c| c.operation_id == operation_id)
            .collect()
    }

    /// True when at least one operation produced a case.
    #[must_use]
    pub fn has_coverage(&self) -> bool {
        self.coverage.operations_covered > 0
    }

    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Test plan: {} cases in {} groups\n",
            self.case_count(),
            self.groups.len(),
        ));

        for group in &self.groups {
            lines.push(format!("{} ({} cases):", group.tag, group.cases.len()));
            for case in &group.cases {
                lines.push(format!(
                    "  [{}] {} {} -> {}",
                    case.kind, case.method, case.path, case.expected
                ));
            }
            lines.push(String::new());
        }

        lines.push(self.coverage.to_terminal());
        lines.join("\n")
    }
}
