//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;
pub mod webhook;

pub use payment::{
    CancelError, CancelPaymentCommand, CancelPaymentHandler, CancelPaymentResult, CancelPhase,
    MarkerCheck,
};
pub use webhook::{
    DispatchOutcome, HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult,
    ResolveWebhookEvent, ResolveWebhookEventHandler, WebhookEventRouter, WebhookRoute,
};
