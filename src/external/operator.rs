use async_trait::async_trait;
use thiserror::Error;

/// Failure while resolving an msisdn to its operator.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("no operator found for msisdn: {0}")]
    NotFound(String),

    #[error("operator lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("expected status code 200 OK from operator directory, got: {0}")]
    UnexpectedStatus(u16),

    #[error("failed to decode operator directory response: {0}")]
    Decode(String),
}

/// Resolves the carrier name for an msisdn.
#[async_trait]
pub trait OperatorDirectory: Send + Sync {
    async fn get(&self, msisdn: &str) -> Result<String, DirectoryError>;
}
