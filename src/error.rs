use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment rejected: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("payment not found for id: {0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("a payment with id {0} already exists")]
    Conflict(String),
    #[error("error processing payment with id: {payment_id}")]
    Processing {
        payment_id: String,
        #[source]
        source: Box<PaymentError>,
    },
    #[error("bank transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bank returned non-success status: {0}")]
    BankStatus(u16),
    #[error("bank response could not be decoded: {0}")]
    MalformedResponse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaymentError {
    /// Whether the bank client may retry after this failure.
    ///
    /// Network-level errors and transient HTTP statuses (408, 429, 5xx)
    /// qualify. A malformed response body never does: the transport
    /// succeeded, so the outcome will not change on a repeat call.
    pub fn is_transient(&self) -> bool {
        match self {
            PaymentError::Transport(_) => true,
            PaymentError::BankStatus(code) => matches!(*code, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}
