//! Stripe configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{StripeSignatureVerifier, DEFAULT_TOLERANCE_SECS};

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_signature_tolerance_secs() -> u64 {
    DEFAULT_TOLERANCE_SECS as u64
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

/// Stripe credentials and client settings
#[derive(Debug, Deserialize)]
pub struct StripeConfig {
    /// Publishable key (pk_...)
    #[serde(default = "empty_secret")]
    pub publishable_key: SecretString,

    /// Secret or restricted API key (sk_... / rk_...)
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,

    /// Webhook signing secrets, tried in this order.
    /// Several are configured while a secret is being rotated.
    #[serde(default)]
    pub webhook_secret_keys: Vec<SecretString>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Allowed signature age in seconds; 0 disables the check
    #[serde(default = "default_signature_tolerance_secs")]
    pub signature_tolerance_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            publishable_key: empty_secret(),
            secret_key: empty_secret(),
            webhook_secret_keys: Vec::new(),
            api_base_url: default_api_base_url(),
            signature_tolerance_secs: default_signature_tolerance_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl StripeConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().contains("_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.expose_secret().contains("_live_")
    }

    /// Signature verifier using the configured tolerance
    pub fn verifier(&self) -> StripeSignatureVerifier {
        StripeSignatureVerifier::with_tolerance(self.signature_tolerance_secs)
    }

    /// Webhook secrets in configured order, as owned copies
    pub fn webhook_secrets(&self) -> Vec<SecretString> {
        self.webhook_secret_keys
            .iter()
            .map(|secret| SecretString::new(secret.expose_secret().clone()))
            .collect()
    }

    /// Validate Stripe configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.publishable_key.expose_secret().is_empty() {
            missing.push("publishable_key");
        }
        if self.secret_key.expose_secret().is_empty() {
            missing.push("secret_key");
        }
        if self
            .webhook_secret_keys
            .iter()
            .all(|secret| secret.expose_secret().is_empty())
        {
            missing.push("webhook_secret_keys");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredFields(missing.join(", ")));
        }

        // Verify key prefixes for safety
        if !self.publishable_key.expose_secret().starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }
        let secret_key = self.secret_key.expose_secret();
        if !secret_key.starts_with("sk_") && !secret_key.starts_with("rk_") {
            return Err(ValidationError::InvalidSecretKey);
        }
        if self
            .webhook_secret_keys
            .iter()
            .any(|secret| !secret.expose_secret().starts_with("whsec_"))
        {
            return Err(ValidationError::InvalidWebhookSecret);
        }

        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("stripe.api_base_url"));
        }

        Ok(())
    }
}
