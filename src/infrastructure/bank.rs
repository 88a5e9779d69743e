use crate::domain::payment::{AuthorizationRequest, AuthorizationResponse};
use crate::domain::ports::BankClient;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const PAYMENTS_PATH: &str = "/payments";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON body sent to the bank. The correlation token stays out of this
/// payload; it only appears in local log events.
#[derive(Debug, Serialize)]
struct BankApiRequest<'a> {
    card_number: &'a str,
    expiry_date: &'a str,
    currency: &'a str,
    amount: i64,
    cvv: &'a str,
}

#[derive(Debug, Deserialize)]
struct BankApiResponse {
    authorized: bool,
    #[serde(default)]
    authorization_code: String,
}

/// HTTP transport to the bank's authorization endpoint.
///
/// This adapter makes a single attempt per call; wrap it in
/// [`crate::infrastructure::retry::RetryingBankClient`] for the retry
/// policy.
pub struct HttpBankClient {
    base_url: String,
    http: Client,
}

impl HttpBankClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl BankClient for HttpBankClient {
    async fn authorize(&self, request: AuthorizationRequest) -> Result<AuthorizationResponse> {
        let url = format!("{}{}", self.base_url, PAYMENTS_PATH);
        let body = BankApiRequest {
            card_number: &request.card_number,
            expiry_date: &request.expiry_date,
            currency: &request.currency,
            amount: request.amount,
            cvv: &request.cvv,
        };

        info!(
            payment_id = %request.payment_id,
            amount = request.amount,
            currency = %request.currency,
            "sending authorization request to bank"
        );

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(
                payment_id = %request.payment_id,
                status = status.as_u16(),
                "bank returned non-success status"
            );
            return Err(PaymentError::BankStatus(status.as_u16()));
        }

        // A 2xx with an undecodable body is a processing error, never a
        // successful authorization, and must not be retried.
        let payload = response.text().await?;
        let decoded: BankApiResponse = serde_json::from_str(&payload)
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        info!(
            payment_id = %request.payment_id,
            authorized = decoded.authorized,
            authorization_code = %decoded.authorization_code,
            "bank authorization completed"
        );

        Ok(AuthorizationResponse {
            authorized: decoded.authorized,
            authorization_code: decoded.authorization_code,
        })
    }
}
