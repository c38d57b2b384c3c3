//! Stripe API client for payment processing.
//!
//! Covers the two contracts the purchase flow needs: customer provisioning
//! (retrieve/create, keyed by the user's stored customer reference) and
//! charge creation. Anything else Stripe offers is out of scope.
//!
//! Calls are synchronous awaits with no internal retry; any HTTP or API
//! error is a hard failure of the purchase operation.

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::StripeConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Currency all charges are denominated in.
const CURRENCY: &str = "usd";

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Amount cannot be expressed in cents.
    #[error("amount {0} cannot be converted to cents")]
    InvalidAmount(Decimal),
}

/// A Stripe customer resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    /// Present and true when the customer has been deleted at the gateway.
    #[serde(default)]
    pub deleted: bool,
}

/// A confirmed charge, as the credit engine consumes it.
///
/// Only produced from a successful gateway response; holding one is the
/// proof that money moved.
#[derive(Debug, Clone)]
pub struct ChargeConfirmation {
    /// Gateway charge id.
    pub charge_id: String,
    /// Customer that was charged.
    pub customer_id: String,
    /// Charged amount in dollars.
    pub amount: Decimal,
}

/// Raw charge resource from the API.
#[derive(Debug, Deserialize)]
struct Charge {
    id: String,
    customer: Option<String>,
}

/// Error payload shape returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the secret key
    /// is not a valid header value.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Retrieve a customer by its gateway id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the customer is unknown.
    pub async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, StripeError> {
        let url = format!("{BASE_URL}/customers/{customer_id}");

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    /// Create a customer from an email and a card token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_customer(
        &self,
        email: &str,
        source_token: &str,
    ) -> Result<Customer, StripeError> {
        let url = format!("{BASE_URL}/customers");

        let response = self
            .client
            .post(&url)
            .form(&[("email", email), ("source", source_token)])
            .send()
            .await?;
        read_json(response).await
    }

    /// Look up the user's existing gateway customer, or create one.
    ///
    /// A stale stored reference (retrieval failure or a deleted customer)
    /// falls through to creation rather than failing the purchase. Returns
    /// the customer and whether it was newly created, so the caller can
    /// persist a fresh reference.
    ///
    /// # Errors
    ///
    /// Returns an error only if creation fails.
    pub async fn find_or_create_customer(
        &self,
        existing_ref: Option<&str>,
        email: &str,
        source_token: &str,
    ) -> Result<(Customer, bool), StripeError> {
        if let Some(customer_id) = existing_ref {
            match self.retrieve_customer(customer_id).await {
                Ok(customer) if !customer.deleted => return Ok((customer, false)),
                Ok(_) => {
                    tracing::warn!(customer_id, "Stored Stripe customer was deleted, recreating");
                }
                Err(e) => {
                    tracing::warn!(customer_id, error = %e, "Error fetching Stripe customer, recreating");
                }
            }
        }

        let customer = self.create_customer(email, source_token).await?;
        Ok((customer, true))
    }

    /// Charge a customer.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::InvalidAmount` if the amount doesn't convert
    /// to whole cents, or an API/HTTP error if the charge fails.
    pub async fn create_charge(
        &self,
        customer_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<ChargeConfirmation, StripeError> {
        // Stripe deals with money in cents
        let cents = amount_to_cents(amount).ok_or(StripeError::InvalidAmount(amount))?;
        let cents_value = cents.to_string();

        let url = format!("{BASE_URL}/charges");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("customer", customer_id),
                ("amount", cents_value.as_str()),
                ("currency", CURRENCY),
                ("description", description),
            ])
            .send()
            .await?;
        let charge: Charge = read_json(response).await?;

        Ok(ChargeConfirmation {
            customer_id: charge.customer.unwrap_or_else(|| customer_id.to_owned()),
            charge_id: charge.id,
            amount,
        })
    }
}

/// Convert a dollar amount to whole cents.
fn amount_to_cents(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(100)).trunc().to_i64()
}

/// Read a JSON body, mapping non-success statuses to `StripeError::Api`.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StripeError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);
        return Err(StripeError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| StripeError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_to_cents() {
        assert_eq!(amount_to_cents(Decimal::from(5)), Some(500));
        assert_eq!(amount_to_cents(Decimal::new(150, 2)), Some(150));
        assert_eq!(amount_to_cents(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_customer_deserializes() {
        let json = r#"{"id": "cus_123", "object": "customer", "email": "a@b.com"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.id, "cus_123");
        assert_eq!(customer.email.as_deref(), Some("a@b.com"));
        assert!(!customer.deleted);
    }

    #[test]
    fn test_deleted_customer_deserializes() {
        let json = r#"{"id": "cus_123", "deleted": true}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert!(customer.deleted);
    }

    #[test]
    fn test_charge_deserializes() {
        let json = r#"{"id": "ch_42", "object": "charge", "customer": "cus_123", "amount": 500}"#;
        let charge: Charge = serde_json::from_str(json).unwrap();
        assert_eq!(charge.id, "ch_42");
        assert_eq!(charge.customer.as_deref(), Some("cus_123"));
    }

    #[test]
    fn test_api_error_envelope_deserializes() {
        let json = r#"{"error": {"type": "card_error", "message": "Your card was declined."}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("Your card was declined.")
        );
    }
}
