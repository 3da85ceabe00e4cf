//! Stripe intents API client.
//!
//! Implements `StripeResourceClient` over Stripe's REST API with reqwest.
//!
//! # Protocol
//!
//! - `POST /v1/{payment_intents|setup_intents}/{id}` updates
//! - `POST /v1/{payment_intents|setup_intents}/{id}/cancel` cancels
//! - Bodies are form-encoded with Stripe's bracket notation
//!   (`metadata[cancel_authorized_token_hash]=...`)
//! - Authentication is HTTP basic with the secret key as user name

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::config::StripeConfig;
use crate::domain::payment::{ApiResource, ResourceType};
use crate::ports::{PaymentError, PaymentErrorCode, StripeResourceClient};

/// Default Stripe API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Connection settings for the Stripe API.
#[derive(Clone)]
pub struct StripeApiConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whole-request timeout.
    timeout: Duration,
}

impl StripeApiConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Settings from the loaded gateway configuration.
    pub fn from_config(config: &StripeConfig) -> Self {
        Self {
            secret_key: SecretString::new(config.secret_key.expose_secret().clone()),
            api_base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe intents client.
pub struct StripeHttpClient {
    config: StripeApiConfig,
    http_client: reqwest::Client,
}

impl StripeHttpClient {
    pub fn new(config: StripeApiConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Endpoint for an intent, plus an optional action segment.
    ///
    /// The id goes in as a single percent-encoded path segment, so `/`, `?`
    /// and `#` inside it cannot reach another endpoint.
    fn resource_url(
        &self,
        resource: ResourceType,
        id: &str,
        action: Option<&str>,
    ) -> Result<reqwest::Url, PaymentError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(PaymentError::invalid_request(format!(
                "Invalid {} id: {:?}",
                resource, id
            )));
        }

        let mut url = reqwest::Url::parse(&self.config.api_base_url)
            .map_err(|e| PaymentError::invalid_request(format!("Invalid Stripe API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::invalid_request("Stripe API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1", resource.api_path(), id])
            .extend(action);
        Ok(url)
    }

    async fn post(
        &self,
        url: reqwest::Url,
        params: &[(String, String)],
        operation: &'static str,
    ) -> Result<ApiResource, PaymentError> {
        let response = self
            .http_client
            .post(url)
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = map_error_response(status.as_u16(), &error_text);
            tracing::error!(
                operation,
                status = status.as_u16(),
                error = %err,
                "Stripe request failed"
            );
            return Err(err);
        }

        response.json::<ApiResource>().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::Unknown,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

#[async_trait]
impl StripeResourceClient for StripeHttpClient {
    async fn update(
        &self,
        resource: ResourceType,
        id: &str,
        params: Value,
    ) -> Result<ApiResource, PaymentError> {
        let url = self.resource_url(resource, id, None)?;
        self.post(url, &encode_form_params(&params), "update").await
    }

    async fn cancel(&self, resource: ResourceType, id: &str) -> Result<ApiResource, PaymentError> {
        let url = self.resource_url(resource, id, Some("cancel"))?;
        self.post(url, &[], "cancel").await
    }
}

/// Flattens a JSON object into Stripe's bracketed form fields.
///
/// Nested objects become `key[sub]`, arrays `key[0]`. `null` and empty
/// objects encode as an empty string, which Stripe reads as "unset".
pub fn encode_form_params(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            flatten(key.clone(), value, &mut pairs);
        }
    }
    pairs
}

fn flatten(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if map.is_empty() => out.push((prefix, String::new())),
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{}[{}]", prefix, key), nested, out);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten(format!("{}[{}]", prefix, index), nested, out);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Null => out.push((prefix, String::new())),
        other => out.push((prefix, other.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Maps a non-success Stripe response onto a `PaymentError`.
fn map_error_response(status: u16, body: &str) -> PaymentError {
    let code = match status {
        400 | 409 => PaymentErrorCode::InvalidRequest,
        401 | 403 => PaymentErrorCode::AuthenticationError,
        402 => PaymentErrorCode::CardDeclined,
        404 => PaymentErrorCode::NotFound,
        429 => PaymentErrorCode::RateLimitExceeded,
        500..=599 => PaymentErrorCode::ProviderError,
        _ => PaymentErrorCode::Unknown,
    };

    let detail = serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .map(|body| body.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status));

    let err = PaymentError::new(code, message);
    match detail.and_then(|d| d.code) {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> StripeHttpClient {
        StripeHttpClient::new(StripeApiConfig::new("sk_test_key")).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = StripeApiConfig::new("sk_test_key");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_with_base_url() {
        let config = StripeApiConfig::new("key").with_base_url("http://localhost:12111");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    #[test]
    fn resource_urls() {
        let client = client();

        assert_eq!(
            client.resource_url(ResourceType::PaymentIntent, "pi_1", None).unwrap().as_str(),
            "https://api.stripe.com/v1/payment_intents/pi_1"
        );
        assert_eq!(
            client
                .resource_url(ResourceType::SetupIntent, "seti_1", Some("cancel"))
                .unwrap()
                .as_str(),
            "https://api.stripe.com/v1/setup_intents/seti_1/cancel"
        );
    }

    #[test]
    fn resource_url_keeps_base_path_prefix() {
        let client = StripeHttpClient::new(
            StripeApiConfig::new("sk_test_key").with_base_url("http://localhost:12111/stripe/"),
        )
        .unwrap();

        assert_eq!(
            client.resource_url(ResourceType::PaymentIntent, "pi_1", None).unwrap().as_str(),
            "http://localhost:12111/stripe/v1/payment_intents/pi_1"
        );
    }

    #[test]
    fn resource_url_encodes_reserved_characters_in_id() {
        let client = client();

        assert_eq!(
            client
                .resource_url(ResourceType::PaymentIntent, "pi_x/cancel", None)
                .unwrap()
                .as_str(),
            "https://api.stripe.com/v1/payment_intents/pi_x%2Fcancel"
        );
        assert_eq!(
            client
                .resource_url(ResourceType::PaymentIntent, "pi_x?expand=a#f", Some("cancel"))
                .unwrap()
                .as_str(),
            "https://api.stripe.com/v1/payment_intents/pi_x%3Fexpand=a%23f/cancel"
        );
    }

    #[test]
    fn resource_url_rejects_empty_and_dot_ids() {
        let client = client();

        for id in ["", ".", ".."] {
            let err = client
                .resource_url(ResourceType::PaymentIntent, id, None)
                .unwrap_err();
            assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Form Encoding Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn encodes_nested_metadata_with_brackets() {
        let pairs = encode_form_params(&json!({
            "metadata": { "cancel_authorized_token_hash": "abc" }
        }));

        assert_eq!(
            pairs,
            vec![(
                "metadata[cancel_authorized_token_hash]".to_string(),
                "abc".to_string()
            )]
        );
    }

    #[test]
    fn encodes_arrays_scalars_and_nulls() {
        let pairs = encode_form_params(&json!({
            "amount": 1000,
            "capture": true,
            "description": null,
            "expand": ["latest_charge", "customer"]
        }));

        assert!(pairs.contains(&("amount".to_string(), "1000".to_string())));
        assert!(pairs.contains(&("capture".to_string(), "true".to_string())));
        assert!(pairs.contains(&("description".to_string(), String::new())));
        assert!(pairs.contains(&("expand[0]".to_string(), "latest_charge".to_string())));
        assert!(pairs.contains(&("expand[1]".to_string(), "customer".to_string())));
    }

    #[test]
    fn non_object_params_encode_to_nothing() {
        assert!(encode_form_params(&json!("pi_1")).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn maps_stripe_error_body() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"payment_intent_unexpected_state","message":"You cannot cancel this PaymentIntent because it has a status of succeeded."}}"#;

        let err = map_error_response(400, body);

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
        assert_eq!(
            err.provider_code.as_deref(),
            Some("payment_intent_unexpected_state")
        );
        assert!(err.message.contains("status of succeeded"));
    }

    #[test]
    fn maps_status_codes() {
        assert_eq!(map_error_response(401, "").code, PaymentErrorCode::AuthenticationError);
        assert_eq!(map_error_response(402, "").code, PaymentErrorCode::CardDeclined);
        assert_eq!(map_error_response(404, "").code, PaymentErrorCode::NotFound);
        assert_eq!(map_error_response(429, "").code, PaymentErrorCode::RateLimitExceeded);
        assert_eq!(map_error_response(503, "").code, PaymentErrorCode::ProviderError);
        assert_eq!(map_error_response(418, "").code, PaymentErrorCode::Unknown);
    }

    #[test]
    fn unparseable_error_body_keeps_status_in_message() {
        let err = map_error_response(502, "<html>bad gateway</html>");

        assert_eq!(err.message, "Stripe API error (502)");
        assert!(err.retryable);
    }
}
