//! Stripe intents adapter.
//!
//! Implements the `StripeResourceClient` port against Stripe's REST API,
//! plus an in-memory mock for tests.
//!
//! # Security
//!
//! - The secret key is held in `secrecy::SecretString` and only exposed when
//!   building the basic-auth header
//!
//! # Configuration
//!
//! Read from `StripeConfig`:
//! - `secret_key`: Stripe secret API key (sk_... or rk_...)
//! - `api_base_url`: API host, overridable for local fakes
//! - `request_timeout_secs`: whole-request timeout

mod mock_stripe_client;
mod stripe_client;

pub use mock_stripe_client::{MethodCall, MockStripeClient};
pub use stripe_client::{
    encode_form_params, StripeApiConfig, StripeHttpClient, DEFAULT_API_BASE_URL,
};
