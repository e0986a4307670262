//! Error taxonomy
//!
//! [`ResolveError`] and [`GenerateError`] abort a whole run. [`SynthError`]
//! and malformed operations are recovered per operation and reported as
//! skipped in the coverage report.

/// A `$ref` that cannot be followed. Fatal for the whole document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("dangling reference: {0}")]
    Dangling(String),
    #[error("external reference not supported: {0}")]
    External(String),
    #[error("reference loop through non-schema object: {0}")]
    Loop(String),
}

/// Example synthesis failure for one operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    #[error("conflicting allOf members at {path}: {left} vs {right}")]
    Composition {
        path: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("unresolved reference reached synthesis: {0}")]
    Unresolved(String),
}

/// Failure while extracting one operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ExtractError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("malformed operation: {0}")]
    Malformed(String),
    #[error("unresolvable content type: {0}")]
    UnresolvableContent(String),
}

/// Errors that abort generation for the whole document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
