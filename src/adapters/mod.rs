//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway core to external systems:
//! - `stripe` - Stripe intents API client (and a mock for tests)
//! - `token` - In-process token storage and notify-token minting
//! - `notify` - Channel-backed notifier
//! - `http` - Axum webhook endpoint

pub mod http;
pub mod notify;
pub mod stripe;
pub mod token;

pub use http::{webhook_router, WebhookAppState};
pub use notify::ChannelNotifier;
pub use stripe::{MockStripeClient, StripeApiConfig, StripeHttpClient};
pub use token::InMemoryTokenStore;
