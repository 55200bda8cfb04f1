use thiserror::Error;

/// Errors raised while loading, merging and publishing configurations.
///
/// Everything except [`MergeError::Publish`] and [`MergeError::Settings`] is
/// recoverable: the pipeline logs the failure, drops the offending source or
/// entry and keeps going. A publish failure aborts the run.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("YAML parse failure: {0}")]
    Parse(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Malformed rule entry: {0}")]
    MalformedRule(String),

    #[error("Publish failure: {0}")]
    Publish(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Other error: {0}")]
    Other(String),
}
