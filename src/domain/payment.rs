use serde::{Deserialize, Serialize};

/// An inbound card-payment request, immutable once constructed.
///
/// Amounts are integers in the minor currency unit (e.g. cents for USD).
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PaymentRequest {
    pub merchant_id: String,
    pub merchant_transaction_key: String,
    pub card_number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub currency: String,
    pub amount: i64,
    pub cvv: String,
}

/// Lifecycle of a payment record. `Initiated` transitions to exactly one
/// of `Completed` or `Failed` once the authorization attempt resolves.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PaymentStatus {
    Initiated,
    Completed,
    Failed,
}

/// The persisted payment entity.
///
/// The identifier is assigned exactly once, by the store, at creation.
/// Bank-outcome fields are populated if and only if the record reaches
/// `Completed`. The full card number never leaves the record; projections
/// expose the last four digits only.
#[derive(Debug, PartialEq, Clone)]
pub struct PaymentRecord {
    pub id: String,
    pub merchant_id: String,
    pub merchant_transaction_key: String,
    pub card_number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub currency: String,
    pub amount: i64,
    pub cvv: String,
    pub status: PaymentStatus,
    pub bank_authorization_code: Option<String>,
    pub bank_authorized: Option<bool>,
}

/// What the bank needs to decide on a payment. The `payment_id` is a
/// correlation token for local logging only; it is never serialized
/// into the bank's business payload.
#[derive(Debug, PartialEq, Clone)]
pub struct AuthorizationRequest {
    pub payment_id: String,
    pub card_number: String,
    /// Formatted as `MM/YYYY`.
    pub expiry_date: String,
    pub currency: String,
    pub amount: i64,
    pub cvv: String,
}

/// The bank's decision. A decline (`authorized == false`) is a successful
/// call with a negative outcome, never an error.
#[derive(Debug, PartialEq, Clone)]
pub struct AuthorizationResponse {
    pub authorized: bool,
    pub authorization_code: String,
}

/// Outward projection of a payment record.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PaymentResponse {
    pub id: String,
    pub status: String,
    pub last_four_card_digits: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub currency: String,
    pub amount: i64,
}

pub const STATUS_AUTHORIZED: &str = "Authorized";
pub const STATUS_DECLINED: &str = "Declined";

impl PaymentRecord {
    /// Builds a fresh record in `Initiated` state. The identifier stays
    /// empty until the store assigns one.
    pub fn initiated(request: PaymentRequest) -> Self {
        Self {
            id: String::new(),
            merchant_id: request.merchant_id,
            merchant_transaction_key: request.merchant_transaction_key,
            card_number: request.card_number,
            expiry_month: request.expiry_month,
            expiry_year: request.expiry_year,
            currency: request.currency,
            amount: request.amount,
            cvv: request.cvv,
            status: PaymentStatus::Initiated,
            bank_authorization_code: None,
            bank_authorized: None,
        }
    }

    pub fn to_authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            payment_id: self.id.clone(),
            card_number: self.card_number.clone(),
            expiry_date: format!("{:02}/{}", self.expiry_month, self.expiry_year),
            currency: self.currency.clone(),
            amount: self.amount,
            cvv: self.cvv.clone(),
        }
    }

    /// Records the bank's decision. Both authorized and declined outcomes
    /// complete the record.
    pub fn complete(&mut self, response: &AuthorizationResponse) {
        self.status = PaymentStatus::Completed;
        self.bank_authorization_code = Some(response.authorization_code.clone());
        self.bank_authorized = Some(response.authorized);
    }

    pub fn fail(&mut self) {
        self.status = PaymentStatus::Failed;
    }

    pub fn last_four(&self) -> &str {
        &self.card_number[self.card_number.len().saturating_sub(4)..]
    }

    /// Projects the record into the outward response shape. Pure function
    /// of the record state: a `Completed` record with `authorized == true`
    /// renders `Authorized`, everything else renders `Declined`.
    pub fn to_response(&self) -> PaymentResponse {
        let status = if self.bank_authorized == Some(true) {
            STATUS_AUTHORIZED
        } else {
            STATUS_DECLINED
        };
        PaymentResponse {
            id: self.id.clone(),
            status: status.to_string(),
            last_four_card_digits: self.last_four().to_string(),
            expiry_month: self.expiry_month,
            expiry_year: self.expiry_year,
            currency: self.currency.clone(),
            amount: self.amount,
        }
    }
}
