use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::PaymentStatusRecord;

/// Storage capability for reconciled payment status. Injected into the
/// application state so reconciliation logic stays independent of the
/// backing store.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Look up the record for a payment id. Absence means "pending".
    async fn get(&self, payment_id: &str) -> Option<PaymentStatusRecord>;

    /// Insert or overwrite the record for a payment id. Last write wins.
    async fn upsert(&self, payment_id: &str, record: PaymentStatusRecord);
}

/// In-memory store backed by a concurrent map. Each upsert is a single map
/// entry write, so per-key updates are atomic under concurrent handlers.
/// Records expire after `ttl`; expired entries read as absent and are removed
/// by [`spawn_sweeper`].
pub struct InMemoryPaymentStore {
    entries: DashMap<String, PaymentStatusRecord>,
    ttl: Duration,
}

impl InMemoryPaymentStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    fn is_expired(&self, record: &PaymentStatusRecord) -> bool {
        (chrono::Utc::now() - record.updated_at)
            .to_std()
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }

    /// Remove all expired records, returning how many were evicted.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, record| !self.is_expired(record));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn get(&self, payment_id: &str) -> Option<PaymentStatusRecord> {
        let record = self.entries.get(payment_id)?;
        if self.is_expired(&record) {
            None
        } else {
            Some(record.clone())
        }
    }

    async fn upsert(&self, payment_id: &str, record: PaymentStatusRecord) {
        self.entries.insert(payment_id.to_string(), record);
    }
}

/// Periodically purge expired status records so the table cannot grow
/// without bound.
pub fn spawn_sweeper(
    store: Arc<InMemoryPaymentStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let evicted = store.purge_expired();
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted expired payment status records");
            }
        }
    })
}
