//! Gateway configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STRIPE_GATEWAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use stripe_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Webhooks verified for gateway {}", config.gateway_name);
//! ```

mod error;
mod notify;
mod stripe;

pub use error::{ConfigError, ValidationError};
pub use notify::NotifyConfig;
pub use stripe::StripeConfig;

use serde::Deserialize;

/// Env var prefix.
pub const ENV_PREFIX: &str = "STRIPE_GATEWAY";

fn default_gateway_name() -> String {
    "stripe".to_string()
}

/// Root gateway configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Required Stripe fields default to empty so that [`AppConfig::validate()`]
/// can report all of them at once.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Name stamped on minted tokens
    #[serde(default = "default_gateway_name")]
    pub gateway_name: String,

    /// Stripe credentials and client settings
    #[serde(default)]
    pub stripe: StripeConfig,

    /// Notify token targets
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STRIPE_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Splits `stripe.webhook_secret_keys` on commas (list splitting only
    ///    happens with `try_parsing` enabled)
    ///
    /// # Environment Variable Format
    ///
    /// - `STRIPE_GATEWAY__STRIPE__SECRET_KEY=sk_test_...` -> `stripe.secret_key`
    /// - `STRIPE_GATEWAY__STRIPE__WEBHOOK_SECRET_KEYS=whsec_a,whsec_b` -> two secrets
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("stripe.webhook_secret_keys"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.stripe.validate()?;
        self.notify.validate()?;
        Ok(())
    }
}
