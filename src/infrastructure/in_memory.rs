use crate::domain::payment::PaymentRecord;
use crate::domain::ports::PaymentStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// A thread-safe in-memory store for payment records.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentRecord>>>` so clones share the
/// same map; tests hold a clone to inspect state the processor wrote.
/// Identifiers are uuid-v4 strings generated on `create`.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<String, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. Test helper; not part of the store port.
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, mut record: PaymentRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        record.id = id.clone();

        let mut payments = self.payments.write().await;
        match payments.entry(id.clone()) {
            Entry::Occupied(_) => {
                warn!(payment_id = %id, "generated identifier already exists");
                Err(PaymentError::Conflict(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                debug!(payment_id = %id, "payment record created");
                Ok(id)
            }
        }
    }

    async fn fetch(&self, id: &str) -> Result<Option<PaymentRecord>> {
        if id.trim().is_empty() {
            return Err(PaymentError::InvalidArgument(
                "payment id cannot be empty".to_string(),
            ));
        }

        let payments = self.payments.read().await;
        let record = payments.get(id).cloned();
        if record.is_none() {
            debug!(payment_id = %id, "payment record not found");
        }
        Ok(record)
    }

    async fn update(&self, record: PaymentRecord) -> Result<()> {
        if record.id.trim().is_empty() {
            return Err(PaymentError::InvalidArgument(
                "payment id cannot be empty".to_string(),
            ));
        }

        let mut payments = self.payments.write().await;
        match payments.get_mut(&record.id) {
            Some(slot) => {
                debug!(payment_id = %record.id, status = ?record.status, "payment record updated");
                *slot = record;
                Ok(())
            }
            None => {
                warn!(payment_id = %record.id, "update for unknown payment record");
                Err(PaymentError::NotFound(record.id))
            }
        }
    }
}
