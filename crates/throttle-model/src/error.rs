use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("invalid concurrency limit: {0}")]
    InvalidConcurrency(String),

    #[error("unknown failure policy: {0}")]
    UnknownFailurePolicy(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
