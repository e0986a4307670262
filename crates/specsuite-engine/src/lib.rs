//! specsuite-engine: OpenAPI document → test plan
//!
//! Pipeline: [`resolve`] `$ref`s into [`node::SchemaNode`] trees, [`extract`]
//! operations, [`synth`]esize examples, [`build`] the plan.

pub mod build;
pub mod error;
pub mod extract;
pub mod node;
pub mod resolve;
pub mod synth;

use serde_json::Value;
use tracing::info;

use specsuite_core::{GenerationOptions, TestPlan};

pub use build::{build_cases, build_plan};
pub use error::{GenerateError, ResolveError, SynthError};
pub use extract::{Extraction, Operation, extract_operations};
pub use node::SchemaNode;
pub use resolve::Resolver;
pub use synth::{SynthContext, synthesize, variants};

/// Generate a test plan from a parsed OpenAPI document.
///
/// # Errors
///
/// Fails on a non-object root, a non-object `paths`, or any `$ref` that
/// cannot be resolved. Per-operation problems are reported in the plan's
/// coverage instead.
pub fn generate(doc: &Value, options: &GenerationOptions) -> Result<TestPlan, GenerateError> {
    if !doc.is_object() {
        return Err(GenerateError::InvalidDocument(
            "document root is not an object".into(),
        ));
    }

    let mut resolver = Resolver::new(doc);
    let extraction = extract_operations(doc, &mut resolver)?;
    let plan = build_plan(&extraction, options);

    info!(
        operations = plan.coverage.operations_total,
        covered = plan.coverage.operations_covered,
        cases = plan.coverage.total_tests,
        skipped = plan.coverage.skipped.len(),
        schemas = resolver.cached_pointers(),
        "generated test plan"
    );
    Ok(plan)
}
