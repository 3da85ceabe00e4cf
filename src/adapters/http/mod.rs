//! HTTP adapters - REST API implementations.

pub mod webhook;

// Re-export key types for convenience
pub use webhook::webhook_router;
pub use webhook::WebhookAppState;
