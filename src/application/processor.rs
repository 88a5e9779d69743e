use crate::domain::payment::{PaymentRecord, PaymentRequest, PaymentResponse};
use crate::domain::ports::{BankClientBox, PaymentStoreBox};
use crate::domain::validation::PaymentValidator;
use crate::error::{PaymentError, Result};
use tracing::{error, info, warn};

/// Orchestrates the payment pipeline: validate, create an `Initiated`
/// record, call the bank, transition the record to `Completed` or
/// `Failed`, and project the final response.
///
/// Per payment the sequence is strictly ordered (create happens-before
/// authorize happens-before update); independent payments carry no
/// ordering guarantee. Duplicate submissions are not detected: there is
/// no idempotency key, so a client retry can double-charge.
pub struct PaymentProcessor {
    store: PaymentStoreBox,
    bank: BankClientBox,
    validator: PaymentValidator,
}

impl PaymentProcessor {
    pub fn new(store: PaymentStoreBox, bank: BankClientBox, validator: PaymentValidator) -> Self {
        Self {
            store,
            bank,
            validator,
        }
    }

    /// Runs the full pipeline for one payment request.
    ///
    /// Validation failures reject the request before any record exists.
    /// The record is persisted in `Initiated` state before the bank call
    /// so a record survives even if the call never returns. Any error
    /// after creation marks the record `Failed` (best effort) and
    /// surfaces as `PaymentError::Processing` wrapping the cause.
    pub async fn process(&self, request: PaymentRequest) -> Result<PaymentResponse> {
        let failures = self.validator.validate(&request);
        if !failures.is_empty() {
            info!(
                merchant_transaction_key = %request.merchant_transaction_key,
                failures = failures.len(),
                "payment rejected by validation"
            );
            return Err(PaymentError::Validation(failures));
        }

        let mut record = PaymentRecord::initiated(request);
        record.id = self.store.create(record.clone()).await?;
        info!(
            payment_id = %record.id,
            merchant_transaction_key = %record.merchant_transaction_key,
            "payment initiated"
        );

        match self.authorize_and_complete(&mut record).await {
            Ok(()) => Ok(record.to_response()),
            Err(err) => {
                error!(payment_id = %record.id, error = %err, "payment processing failed");
                record.fail();
                // Best effort: a failed persist must not mask the cause.
                if let Err(persist_err) = self.store.update(record.clone()).await {
                    warn!(
                        payment_id = %record.id,
                        error = %persist_err,
                        "could not persist failed status"
                    );
                }
                Err(PaymentError::Processing {
                    payment_id: record.id,
                    source: Box::new(err),
                })
            }
        }
    }

    async fn authorize_and_complete(&self, record: &mut PaymentRecord) -> Result<()> {
        let response = self.bank.authorize(record.to_authorization_request()).await?;
        record.complete(&response);
        self.store.update(record.clone()).await?;
        info!(
            payment_id = %record.id,
            authorized = response.authorized,
            "payment completed"
        );
        Ok(())
    }

    /// Read path: fetch a payment by identifier and project it.
    pub async fn get_payment(&self, id: &str) -> Result<PaymentResponse> {
        match self.store.fetch(id).await? {
            Some(record) => Ok(record.to_response()),
            None => {
                warn!(payment_id = %id, "payment not found");
                Err(PaymentError::NotFound(id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{
        AuthorizationRequest, AuthorizationResponse, PaymentStatus, STATUS_AUTHORIZED,
        STATUS_DECLINED,
    };
    use crate::domain::ports::{BankClient, PaymentStore};
    use crate::infrastructure::in_memory::InMemoryPaymentStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Always answers with the configured outcome and records what it saw.
    struct StubBank {
        authorized: bool,
        authorization_code: &'static str,
        seen: Arc<Mutex<Vec<AuthorizationRequest>>>,
    }

    #[async_trait]
    impl BankClient for StubBank {
        async fn authorize(
            &self,
            request: AuthorizationRequest,
        ) -> crate::error::Result<AuthorizationResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(AuthorizationResponse {
                authorized: self.authorized,
                authorization_code: self.authorization_code.to_string(),
            })
        }
    }

    /// Accepts creates and fetches but rejects every update, simulating
    /// a store that degrades mid-payment.
    struct BrokenUpdateStore {
        inner: InMemoryPaymentStore,
    }

    #[async_trait]
    impl PaymentStore for BrokenUpdateStore {
        async fn create(&self, record: PaymentRecord) -> crate::error::Result<String> {
            self.inner.create(record).await
        }

        async fn fetch(&self, id: &str) -> crate::error::Result<Option<PaymentRecord>> {
            self.inner.fetch(id).await
        }

        async fn update(&self, _record: PaymentRecord) -> crate::error::Result<()> {
            Err(PaymentError::InvalidArgument(
                "store unavailable".to_string(),
            ))
        }
    }

    struct UnreachableBank;

    #[async_trait]
    impl BankClient for UnreachableBank {
        async fn authorize(
            &self,
            _request: AuthorizationRequest,
        ) -> crate::error::Result<AuthorizationResponse> {
            Err(PaymentError::BankStatus(503))
        }
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            merchant_id: "merchant-1".to_string(),
            merchant_transaction_key: "order-42".to_string(),
            card_number: "1234567890123456".to_string(),
            expiry_month: 12,
            expiry_year: chrono::Datelike::year(&chrono::Utc::now()) + 1,
            currency: "USD".to_string(),
            amount: 1000,
            cvv: "123".to_string(),
        }
    }

    fn validator() -> PaymentValidator {
        PaymentValidator::new(["USD", "EUR", "GBP"])
    }

    fn processor_with_bank(
        bank: BankClientBox,
    ) -> (PaymentProcessor, InMemoryPaymentStore) {
        let store = InMemoryPaymentStore::new();
        let processor = PaymentProcessor::new(Box::new(store.clone()), bank, validator());
        (processor, store)
    }

    #[tokio::test]
    async fn test_authorized_payment_completes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (processor, store) = processor_with_bank(Box::new(StubBank {
            authorized: true,
            authorization_code: "AUTH123",
            seen: seen.clone(),
        }));

        let response = processor.process(request()).await.unwrap();
        assert_eq!(response.status, STATUS_AUTHORIZED);
        assert_eq!(response.last_four_card_digits, "3456");
        assert_eq!(response.amount, 1000);

        let record = store.fetch(&response.id).await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Completed);
        assert_eq!(record.bank_authorized, Some(true));
        assert_eq!(record.bank_authorization_code, Some("AUTH123".to_string()));

        // The bank saw the record's id as correlation token and the
        // MM/YYYY expiry.
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payment_id, response.id);
        assert!(seen[0].expiry_date.starts_with("12/"));
    }

    #[tokio::test]
    async fn test_declined_payment_still_completes() {
        let (processor, store) = processor_with_bank(Box::new(StubBank {
            authorized: false,
            authorization_code: "",
            seen: Arc::new(Mutex::new(Vec::new())),
        }));

        let response = processor.process(request()).await.unwrap();
        assert_eq!(response.status, STATUS_DECLINED);

        let record = store.fetch(&response.id).await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Completed);
        assert_eq!(record.bank_authorized, Some(false));
    }

    #[tokio::test]
    async fn test_bank_error_marks_record_failed_and_wraps_cause() {
        let (processor, store) = processor_with_bank(Box::new(UnreachableBank));

        let err = processor.process(request()).await.unwrap_err();
        let PaymentError::Processing { payment_id, source } = err else {
            panic!("expected processing failure, got {err:?}");
        };
        assert!(matches!(*source, PaymentError::BankStatus(503)));

        let record = store.fetch(&payment_id).await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Failed);
        assert_eq!(record.bank_authorized, None);
    }

    #[tokio::test]
    async fn test_persistence_error_after_bank_success_surfaces_as_processing() {
        let inner = InMemoryPaymentStore::new();
        let store: PaymentStoreBox = Box::new(BrokenUpdateStore {
            inner: inner.clone(),
        });
        let bank: BankClientBox = Box::new(StubBank {
            authorized: true,
            authorization_code: "AUTH123",
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let processor = PaymentProcessor::new(store, bank, validator());

        let err = processor.process(request()).await.unwrap_err();
        let PaymentError::Processing { payment_id, source } = err else {
            panic!("expected processing failure, got {err:?}");
        };
        assert!(matches!(*source, PaymentError::InvalidArgument(_)));

        // The best-effort Failed persist also failed, so the stored record
        // still shows Initiated; the store error surfaced regardless.
        let record = inner.fetch(&payment_id).await.unwrap().unwrap();
        assert_eq!(record.status, PaymentStatus::Initiated);
        assert_eq!(record.bank_authorized, None);
    }

    #[tokio::test]
    async fn test_failed_persist_does_not_mask_bank_error() {
        let store: PaymentStoreBox = Box::new(BrokenUpdateStore {
            inner: InMemoryPaymentStore::new(),
        });
        let processor = PaymentProcessor::new(store, Box::new(UnreachableBank), validator());

        // Both the bank call and the Failed-status persist go wrong; the
        // surfaced cause must be the bank's, not the store's.
        let err = processor.process(request()).await.unwrap_err();
        let PaymentError::Processing { source, .. } = err else {
            panic!("expected processing failure, got {err:?}");
        };
        assert!(matches!(*source, PaymentError::BankStatus(503)));
    }

    #[tokio::test]
    async fn test_invalid_request_creates_no_record() {
        let (processor, store) = processor_with_bank(Box::new(UnreachableBank));

        let mut invalid = request();
        invalid.currency = "JPY".to_string();
        invalid.amount = 0;

        let err = processor.process(invalid).await.unwrap_err();
        let PaymentError::Validation(failures) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("Currency is not valid"));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_payment_round_trip() {
        let (processor, _store) = processor_with_bank(Box::new(StubBank {
            authorized: true,
            authorization_code: "AUTH123",
            seen: Arc::new(Mutex::new(Vec::new())),
        }));

        let processed = processor.process(request()).await.unwrap();
        let fetched = processor.get_payment(&processed.id).await.unwrap();
        assert_eq!(fetched, processed);
    }

    #[tokio::test]
    async fn test_get_unknown_payment_is_not_found() {
        let (processor, _store) = processor_with_bank(Box::new(UnreachableBank));

        let err = processor.get_payment("never-created").await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound(id) if id == "never-created"));
    }
}
