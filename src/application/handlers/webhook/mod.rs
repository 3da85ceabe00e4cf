//! Webhook handlers.
//!
//! ## Commands
//! - Resolving an inbound webhook into a verified event
//! - Routing a verified event to the host's notify pipeline
//! - The full pipeline combining both

mod event_routes;
mod handle_webhook;
mod resolve_webhook_event;
mod webhook_event_router;

pub use event_routes::{
    default_routes, EventPredicate, WebhookRoute, CHECKOUT_SESSION_COMPLETED,
    PAYMENT_INTENT_AMOUNT_CAPTURABLE_UPDATED, PAYMENT_INTENT_CANCELED,
    PAYMENT_INTENT_CANCELED_FROM_CANCEL, PAYMENT_INTENT_MANUAL_SUCCEEDED,
    PAYMENT_INTENT_SUCCEEDED, SETUP_INTENT_CANCELED, SETUP_INTENT_CANCELED_FROM_CANCEL,
    SETUP_INTENT_SUCCEEDED,
};
pub use handle_webhook::{HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult};
pub use resolve_webhook_event::{ResolveWebhookEvent, ResolveWebhookEventHandler};
pub use webhook_event_router::{DispatchOutcome, WebhookEventRouter};
