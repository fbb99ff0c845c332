//! Derives a subscription's status from its activation time.
//!
//! Nothing calls this on a timer. Status is recomputed only when a mutating
//! store operation asks for it, so a stored status can lag behind the clock.

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::SubscriptionStatus;

/// Computes a status against the current UTC instant.
pub fn derive_status(
    activate_at: Option<DateTime<Utc>>,
    status_override: Option<SubscriptionStatus>,
) -> AppResult<SubscriptionStatus> {
    derive_status_at(activate_at, status_override, Utc::now())
}

/// Computes a status against `now`.
///
/// An override always wins. Otherwise a future `activate_at` is pending and
/// anything at or before `now` is activated.
pub fn derive_status_at(
    activate_at: Option<DateTime<Utc>>,
    status_override: Option<SubscriptionStatus>,
    now: DateTime<Utc>,
) -> AppResult<SubscriptionStatus> {
    if let Some(status) = status_override {
        return Ok(status);
    }

    let activate_at = activate_at
        .ok_or_else(|| AppError::InternalError("cannot derive status without activate_at".to_string()))?;

    if activate_at > now {
        Ok(SubscriptionStatus::Pending)
    } else {
        Ok(SubscriptionStatus::Activated)
    }
}
