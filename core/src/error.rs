use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Not JSON, or no `recommendations` object at the top level.
    #[error("malformed recommendation payload: {0}")]
    MalformedPayload(String),
    /// A single recommendation carried a field of the wrong shape. Aborts the whole parse.
    #[error("recommendation '{key}': cannot read '{field}': {reason}")]
    FieldExtraction {
        key: String,
        field: &'static str,
        reason: String,
    },
    #[error("failed to read payload: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub(crate) fn field(key: &str, field: &'static str, reason: impl Into<String>) -> Self {
        ImportError::FieldExtraction { key: key.to_string(), field, reason: reason.into() }
    }
}
