use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::{DirectoryError, OperatorDirectory};
use crate::config::PtsConfig;

/// Name PTS answers with when a number has no operator.
const OPERATOR_MISSING: &str = "Operatör saknas";

#[derive(Debug, Deserialize)]
struct PtsResponse {
    d: PtsOperator,
}

// `__type` and `Number` are also sent but not needed.
#[derive(Debug, Deserialize)]
struct PtsOperator {
    #[serde(rename = "Name")]
    name: String,
}

/// Operator lookups against the PTS number directory.
#[derive(Clone)]
pub struct PtsDirectory {
    client: Client,
    config: PtsConfig,
}

impl PtsDirectory {
    pub fn new(config: PtsConfig) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .user_agent("subscription-api/pts")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl OperatorDirectory for PtsDirectory {
    async fn get(&self, msisdn: &str) -> Result<String, DirectoryError> {
        let response = self
            .client
            .get(&self.config.url)
            .query(&[("number", msisdn)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("PTS lookup for {msisdn} answered HTTP {}", status.as_u16());
            return Err(DirectoryError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: PtsResponse =
            serde_json::from_slice(&body).map_err(|e| DirectoryError::Decode(e.to_string()))?;

        if parsed.d.name == OPERATOR_MISSING {
            return Err(DirectoryError::NotFound(msisdn.to_string()));
        }

        Ok(parsed.d.name)
    }
}
