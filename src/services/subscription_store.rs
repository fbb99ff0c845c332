use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::status_engine::derive_status;

/// In-memory subscription records keyed by msisdn.
///
/// Every operation takes the same lock, so store mutations are linearizable.
/// Reads do not recompute status.
#[derive(Clone, Default)]
pub struct SubscriptionStore {
    subscriptions: Arc<Mutex<HashMap<String, Subscription>>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records, one entry per msisdn, in no particular order.
    pub async fn list(&self) -> AppResult<Vec<Subscription>> {
        let subscriptions = self.subscriptions.lock().await;
        Ok(subscriptions.values().cloned().collect())
    }

    pub async fn get(&self, msisdn: &str) -> AppResult<Subscription> {
        let subscriptions = self.subscriptions.lock().await;
        subscriptions
            .get(msisdn)
            .cloned()
            .ok_or_else(|| not_found(msisdn))
    }

    /// Inserts `subscription`, replacing any record for the same msisdn unless
    /// that record is activated. The caller computes the status.
    pub async fn create(&self, subscription: Subscription) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;

        if let Some(existing) = subscriptions.get(&subscription.msisdn)
            && existing.is_active()
        {
            return Err(AppError::AlreadyExists(format!(
                "subscription already exists for msisdn: {}",
                subscription.msisdn
            )));
        }

        log::debug!(
            "Storing subscription {} with status {}",
            subscription.msisdn,
            subscription.status
        );
        subscriptions.insert(subscription.msisdn.clone(), subscription.clone());

        Ok(subscription)
    }

    /// Applies `activate_at` and `type` and recomputes status. Moving
    /// `activate_at` is only allowed while the record is pending.
    pub async fn update(&self, input: &SubscriptionInput) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;

        let sub = subscriptions
            .get_mut(&input.msisdn)
            .ok_or_else(|| not_found(&input.msisdn))?;

        if sub.activate_at != input.activate_at && sub.status != SubscriptionStatus::Pending {
            return Err(AppError::ValidationError(
                "subscription needs to be pending to update activate_at".to_string(),
            ));
        }

        let status = derive_status(Some(input.activate_at), None)?;
        sub.activate_at = input.activate_at;
        sub.kind = input.kind;
        sub.status = status;

        Ok(sub.clone())
    }

    /// Pauses the record, or if it is already paused re-derives its status
    /// from `activate_at`.
    pub async fn toggle_paused(&self, msisdn: &str) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;

        let sub = subscriptions
            .get_mut(msisdn)
            .ok_or_else(|| not_found(msisdn))?;

        sub.status = if sub.status == SubscriptionStatus::Paused {
            derive_status(Some(sub.activate_at), None)?
        } else {
            derive_status(Some(sub.activate_at), Some(SubscriptionStatus::Paused))?
        };

        Ok(sub.clone())
    }

    pub async fn cancel(&self, msisdn: &str) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;

        let sub = subscriptions
            .get_mut(msisdn)
            .ok_or_else(|| not_found(msisdn))?;

        sub.status = derive_status(Some(sub.activate_at), Some(SubscriptionStatus::Cancelled))?;

        Ok(sub.clone())
    }
}

fn not_found(msisdn: &str) -> AppError {
    AppError::NotFound(format!("subscription not found for msisdn: {msisdn}"))
}
