//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Webhook handlers
    DispatchOutcome, HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult,
    ResolveWebhookEvent, ResolveWebhookEventHandler, WebhookEventRouter, WebhookRoute,
    // Payment handlers
    CancelError, CancelPaymentCommand, CancelPaymentHandler, CancelPaymentResult, CancelPhase,
    MarkerCheck,
};
