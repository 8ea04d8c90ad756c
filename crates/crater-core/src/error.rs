use thiserror::Error;

/// Errors raised while building inputs for the pipelines.
///
/// The numeric stages themselves never fail; everything that can go wrong is
/// caught while reading configuration or loading a height map.
#[derive(Debug, Error)]
pub enum CraterError {
    #[error("configuration stream ended before field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}`: cannot parse {token:?}")]
    InvalidField { field: &'static str, token: String },

    #[error("field `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("dimension mismatch: expected {expected} bytes, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, CraterError>;
