//! specsuite-core: Test plan interchange types and coverage summary
//!
//! This crate defines the framework-agnostic test plan handed to emitters,
//! the coverage report, and the options that drive generation.

pub mod config;
pub mod coverage;
pub mod plan;
pub mod schema;

pub use config::{
    Config, ConfigError, GenerationOptions, StringRotation, SuccessStatus, VariantPolicy,
};
pub use coverage::{CoverageReport, SkippedOperation, summarize};
pub use plan::{
    CaseKind, ExampleValue, ExpectedStatus, ParamValue, TestCase, TestGroup, TestPlan,
    group_by_tag,
};
