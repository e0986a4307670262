//! JSON Schema export of the plan interchange format
//!
//! Emitters in other languages validate `plan.json` against this schema.

use crate::plan::TestPlan;

/// Generate JSON Schema for the interchange format.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(TestPlan);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
