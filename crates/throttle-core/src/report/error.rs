use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report failed: {0}")]
    Failed(String),

    #[error("reporter panicked: {0}")]
    Panicked(String),
}

impl ReportError {
    pub fn new(reason: impl Into<String>) -> Self {
        ReportError::Failed(reason.into())
    }
}
