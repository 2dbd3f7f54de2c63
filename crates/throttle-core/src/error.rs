use thiserror::Error;
use throttle_model::ModelError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid runner configuration: {0}")]
    Config(#[from] ModelError),

    #[error("runner already started")]
    AlreadyStarted,

    #[error("runner must be started from within a tokio runtime")]
    NoRuntime,

    #[error("runner driver terminated abnormally: {0}")]
    Driver(String),
}
