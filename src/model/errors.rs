use thiserror::Error;

/// A field of a model that does not satisfy its constraints.
///
/// `code` is the dotted path of the offending field prefixed by the
/// operation, e.g. `bad_profile.norms[1].attribute`. It is returned verbatim
/// to API clients so they can point at the field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ValidationError {
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Error on `field` of the model validated under `code_prefix`.
    pub fn field(code_prefix: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError::new(format!("{}.{}", code_prefix, field), message)
    }
}
