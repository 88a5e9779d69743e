use super::payment::PaymentRequest;
use chrono::{Datelike, Utc};
use std::collections::BTreeSet;

/// Structural and business validation of incoming payment requests.
///
/// Every rule is evaluated independently so a request can be rejected
/// with several simultaneous reasons. An empty result means the request
/// is valid. No state is created for an invalid request.
#[derive(Debug, Clone)]
pub struct PaymentValidator {
    allowed_currencies: BTreeSet<String>,
}

impl PaymentValidator {
    /// Builds a validator from the configured currency allow-list.
    pub fn new<I, S>(allowed_currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_currencies: allowed_currencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates against the current wall-clock month.
    pub fn validate(&self, request: &PaymentRequest) -> Vec<String> {
        let now = Utc::now();
        self.validate_at(request, now.year(), now.month())
    }

    /// Clock-injectable variant so expiry rules stay deterministic in tests.
    /// A card expiring in the current month is still valid.
    pub fn validate_at(
        &self,
        request: &PaymentRequest,
        current_year: i32,
        current_month: u32,
    ) -> Vec<String> {
        let mut errors = Vec::new();

        let card = request.card_number.as_str();
        if card.is_empty() {
            errors.push("Card number is required.".to_string());
        }
        if !(14..=19).contains(&card.len()) {
            errors.push("Card number must be between 14 and 19 characters long.".to_string());
        }
        // At least one digit, digits only.
        if card.is_empty() || !card.bytes().all(|b| b.is_ascii_digit()) {
            errors.push("Card number must only contain numeric characters.".to_string());
        }

        if request.expiry_year < current_year {
            errors.push("Expiry year must be the current year or later.".to_string());
        }

        let month_in_range = (1..=12).contains(&request.expiry_month);
        if !month_in_range {
            errors.push("Expiry month must be between 1 and 12.".to_string());
        }

        if month_in_range
            && (request.expiry_year, request.expiry_month) < (current_year, current_month)
        {
            errors.push("The expiry date must not be in the past.".to_string());
        }

        let currency = request.currency.as_str();
        if currency.is_empty() {
            errors.push("Currency is required.".to_string());
        }
        if currency.len() != 3 {
            errors.push("Currency must be 3 characters long.".to_string());
        }
        if !self.allowed_currencies.contains(currency) {
            let accepted: Vec<&str> = self.allowed_currencies.iter().map(String::as_str).collect();
            errors.push(format!(
                "Currency is not valid. Accepted currencies are: {}.",
                accepted.join(", ")
            ));
        }

        if request.amount <= 0 {
            errors.push("Amount must be greater than 0.".to_string());
        }

        let cvv = request.cvv.as_str();
        if cvv.is_empty() {
            errors.push("CVV is required.".to_string());
        }
        if !(3..=4).contains(&cvv.len()) {
            errors.push("CVV must be 3 or 4 characters long.".to_string());
        }
        if cvv.is_empty() || !cvv.bytes().all(|b| b.is_ascii_digit()) {
            errors.push("CVV must only contain numeric characters.".to_string());
        }

        errors
    }
}
