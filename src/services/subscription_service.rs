use futures_util::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::external::OperatorDirectory;
use crate::models::*;
use crate::services::status_engine::derive_status;
use crate::services::SubscriptionStore;

const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Validates input, enriches records with their operator and delegates
/// mutations to the store.
///
/// Lookups are bounded by `lookup_timeout`. Callers cancel an operation by
/// dropping its future, which also drops any lookup still in flight.
#[derive(Clone)]
pub struct SubscriptionService {
    store: SubscriptionStore,
    operators: Arc<dyn OperatorDirectory>,
    lookup_timeout: Duration,
    max_concurrent_lookups: usize,
}

impl SubscriptionService {
    pub fn new(
        store: SubscriptionStore,
        operators: Arc<dyn OperatorDirectory>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            store,
            operators,
            lookup_timeout,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Caps the lookups `list` keeps in flight at once (at least one).
    pub fn with_max_concurrent_lookups(mut self, max: usize) -> Self {
        self.max_concurrent_lookups = max.max(1);
        self
    }

    /// All subscriptions, each annotated with its current operator. One
    /// failed lookup fails the whole call.
    ///
    /// Enrichment runs on a snapshot after the store lock is released.
    pub async fn list(&self) -> AppResult<Vec<Subscription>> {
        let subscriptions = self.store.list().await?;

        stream::iter(subscriptions)
            .map(|mut sub| async move {
                sub.operator = Some(self.lookup_operator(&sub.msisdn).await?);
                Ok::<_, AppError>(sub)
            })
            .buffered(self.max_concurrent_lookups)
            .try_collect()
            .await
    }

    pub async fn get(&self, msisdn: &str) -> AppResult<Subscription> {
        let mut sub = self.store.get(msisdn).await?;
        sub.operator = Some(self.lookup_operator(msisdn).await?);
        Ok(sub)
    }

    pub async fn create(&self, payload: SubscriptionPayload) -> AppResult<Subscription> {
        let input = payload.valid_for_create()?;

        let operator = self.lookup_operator(&input.msisdn).await?;
        let status = derive_status(Some(input.activate_at), None)?;

        let created = self
            .store
            .create(Subscription {
                msisdn: input.msisdn,
                activate_at: input.activate_at,
                kind: input.kind,
                status,
                operator: Some(operator),
            })
            .await?;

        log::info!(
            "Created subscription {} ({}), status {}",
            created.msisdn,
            created.kind,
            created.status
        );
        Ok(created)
    }

    /// Updates `activate_at` and `type`. The stored operator is kept as is.
    pub async fn update(&self, payload: SubscriptionPayload) -> AppResult<Subscription> {
        let input = payload.valid_for_update()?;

        let updated = self.store.update(&input).await?;

        log::info!(
            "Updated subscription {}, status {}",
            updated.msisdn,
            updated.status
        );
        Ok(updated)
    }

    pub async fn toggle_paused(&self, msisdn: &str) -> AppResult<Subscription> {
        let sub = self.store.toggle_paused(msisdn).await?;
        log::info!("Toggled pause on subscription {msisdn}, status {}", sub.status);
        Ok(sub)
    }

    pub async fn cancel(&self, msisdn: &str) -> AppResult<Subscription> {
        let sub = self.store.cancel(msisdn).await?;
        log::info!("Cancelled subscription {msisdn}");
        Ok(sub)
    }

    /// Directory lookup bounded by the configured deadline. Any failure,
    /// including an unknown number, is reported as an internal error and
    /// logged where the error is turned into a response.
    async fn lookup_operator(&self, msisdn: &str) -> AppResult<String> {
        let result = tokio::time::timeout(self.lookup_timeout, self.operators.get(msisdn)).await;

        let error = match result {
            Ok(Ok(operator)) => return Ok(operator),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("lookup timed out after {:?}", self.lookup_timeout),
        };

        Err(AppError::InternalError(format!(
            "failed to get operator info for msisdn: {msisdn}, error: {error}"
        )))
    }
}
