// CTA Classifier: tag organization descriptions with critical technology areas
//
// This is the library root. Each module corresponds to a stage of the
// classification pipeline or one of the adapters around it.

pub mod classify;
pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod records;
pub mod session;
pub mod status;
pub mod taxonomy;
