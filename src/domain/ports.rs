use super::payment::{AuthorizationRequest, AuthorizationResponse, PaymentRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Storage contract for payment records.
///
/// Implementations must be safe under arbitrary concurrent callers:
/// `create` is an atomic insert with a store-generated identifier, and
/// `update` is an atomic whole-record replace. Callers mutate records by
/// read-modify-write of the full record, never by partial merge.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Assigns a fresh unique identifier, inserts the record, and returns
    /// the identifier. Fails with `Conflict` if the generated identifier
    /// already exists.
    async fn create(&self, record: PaymentRecord) -> Result<String>;

    /// Returns the record for `id`, or `None` if no such payment exists.
    /// Fails with `InvalidArgument` on an empty identifier.
    async fn fetch(&self, id: &str) -> Result<Option<PaymentRecord>>;

    /// Replaces the stored record for `record.id`. Fails with
    /// `InvalidArgument` on an empty identifier and `NotFound` if the
    /// identifier was never created.
    async fn update(&self, record: PaymentRecord) -> Result<()>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;

/// Outbound call to the external authorization service.
///
/// A declined payment is a successful call; errors are reserved for
/// transport failures, non-success statuses, and undecodable responses.
#[async_trait]
pub trait BankClient: Send + Sync {
    async fn authorize(&self, request: AuthorizationRequest) -> Result<AuthorizationResponse>;
}

pub type BankClientBox = Box<dyn BankClient>;
