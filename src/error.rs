// Errors callers may want to tell apart from ordinary I/O or parse failures.

use thiserror::Error;

/// Session preconditions that were not met.
///
/// Returned inside `anyhow::Error`; use `downcast_ref::<SessionError>()` to
/// distinguish them from data errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No embedding model loaded. Load a word2vec model before classifying.")]
    ModelNotLoaded,

    #[error("No classification results to export. Classify a file first.")]
    NoResults,
}
