use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum SubscriptionType {
    #[serde(rename = "PBX")]
    Pbx,
    #[serde(rename = "CELL")]
    Cell,
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionType::Pbx => write!(f, "PBX"),
            SubscriptionType::Cell => write!(f, "CELL"),
        }
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PBX" => Ok(SubscriptionType::Pbx),
            "CELL" => Ok(SubscriptionType::Cell),
            _ => Err(AppError::ValidationError(
                "type needs to be either PBX or CELL".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Activated,
    Paused,
    Cancelled,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Pending => write!(f, "pending"),
            SubscriptionStatus::Activated => write!(f, "activated"),
            SubscriptionStatus::Paused => write!(f, "paused"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A stored subscription record, keyed by `msisdn`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Subscription {
    #[schema(example = "46700000000")]
    pub msisdn: String,
    pub activate_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub status: SubscriptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Activated
    }
}

/// Client supplied body for create and update.
///
/// Every field is optional so that a missing field and a forbidden field can
/// both be reported as validation errors instead of decode errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionPayload {
    #[schema(example = "46700000000")]
    pub msisdn: Option<String>,
    pub activate_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    #[schema(example = "CELL")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub operator: Option<String>,
}

/// Validated create/update input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionInput {
    pub msisdn: String,
    pub activate_at: DateTime<Utc>,
    pub kind: SubscriptionType,
}

impl SubscriptionPayload {
    pub fn valid_for_create(&self) -> AppResult<SubscriptionInput> {
        self.validate("creating")
    }

    pub fn valid_for_update(&self) -> AppResult<SubscriptionInput> {
        self.validate("updating")
    }

    fn validate(&self, action: &str) -> AppResult<SubscriptionInput> {
        let msisdn = self
            .msisdn
            .clone()
            .ok_or_else(|| AppError::ValidationError("no msisdn provided".to_string()))?;

        let activate_at = self
            .activate_at
            .ok_or_else(|| AppError::ValidationError("no activate_at provided".to_string()))?;

        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| AppError::ValidationError("no type provided".to_string()))?
            .parse::<SubscriptionType>()?;

        if self.status.is_some() {
            return Err(AppError::ValidationError(format!(
                "cannot provide status when {action} subscription"
            )));
        }

        if self.operator.is_some() {
            return Err(AppError::ValidationError(
                "field operator is read only".to_string(),
            ));
        }

        Ok(SubscriptionInput {
            msisdn,
            activate_at,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload() -> SubscriptionPayload {
        SubscriptionPayload {
            msisdn: Some("46700000000".to_string()),
            activate_at: Some(Utc::now() + Duration::hours(1)),
            kind: Some("CELL".to_string()),
            status: None,
            operator: None,
        }
    }

    fn validation_message(result: AppResult<SubscriptionInput>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload() {
        let input = payload().valid_for_create().unwrap();
        assert_eq!(input.msisdn, "46700000000");
        assert_eq!(input.kind, SubscriptionType::Cell);
    }

    #[test]
    fn test_missing_fields() {
        let mut p = payload();
        p.msisdn = None;
        assert_eq!(validation_message(p.valid_for_create()), "no msisdn provided");

        let mut p = payload();
        p.activate_at = None;
        assert_eq!(validation_message(p.valid_for_update()), "no activate_at provided");

        let mut p = payload();
        p.kind = None;
        assert_eq!(validation_message(p.valid_for_create()), "no type provided");
    }

    #[test]
    fn test_unknown_type() {
        let mut p = payload();
        p.kind = Some("cell".to_string());
        assert_eq!(
            validation_message(p.valid_for_create()),
            "type needs to be either PBX or CELL"
        );
    }

    #[test]
    fn test_read_only_fields() {
        let mut p = payload();
        p.status = Some("activated".to_string());
        assert_eq!(
            validation_message(p.valid_for_create()),
            "cannot provide status when creating subscription"
        );
        assert_eq!(
            validation_message(p.valid_for_update()),
            "cannot provide status when updating subscription"
        );

        let mut p = payload();
        p.operator = Some("Telia".to_string());
        assert_eq!(validation_message(p.valid_for_create()), "field operator is read only");
    }

    #[test]
    fn test_wire_shape() {
        let sub = Subscription {
            msisdn: "46700000000".to_string(),
            activate_at: "2030-01-01T00:00:00Z".parse().unwrap(),
            kind: SubscriptionType::Pbx,
            status: SubscriptionStatus::Pending,
            operator: None,
        };
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(value["msisdn"], "46700000000");
        assert_eq!(value["activate_at"], "2030-01-01T00:00:00Z");
        assert_eq!(value["type"], "PBX");
        assert_eq!(value["status"], "pending");
        assert!(value.get("operator").is_none());

        let enriched = Subscription {
            operator: Some("Telia".to_string()),
            ..sub
        };
        assert_eq!(serde_json::to_value(&enriched).unwrap()["operator"], "Telia");
    }

    #[test]
    fn test_payload_null_counts_as_absent() {
        let p: SubscriptionPayload = serde_json::from_str(
            r#"{"msisdn":"46700000000","activate_at":"2030-01-01T00:00:00Z","type":"PBX","status":null}"#,
        )
        .unwrap();
        assert!(p.valid_for_create().is_ok());
    }
}
