use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid subprocess task: {0}")]
    InvalidSpec(String),
}
