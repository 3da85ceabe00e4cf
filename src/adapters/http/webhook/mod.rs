//! HTTP adapter for the Stripe webhook endpoint.
//!
//! - `POST /webhooks/stripe` - Verify and route a Stripe webhook

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, WebhookResponse};
pub use handlers::{handle_stripe_webhook, WebhookApiError, WebhookAppState};
pub use routes::webhook_router;
