//! Webhook route table.
//!
//! Each route is a capability descriptor: the event types it claims, the
//! metadata key holding the local token hash, and a structural predicate
//! over the event's data object. Routes are plain data; the router walks
//! them in order and the first that supports an event claims it.

use crate::domain::payment::{CANCEL_AUTHORIZED_TOKEN_HASH_KEY, TOKEN_HASH_KEY};
use crate::domain::webhook::{StripeEvent, StripeEventType};

/// Structural check over an event, evaluated after type and hash checks.
pub type EventPredicate = fn(&StripeEvent) -> bool;

/// Descriptor of one webhook route.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRoute {
    pub name: &'static str,
    pub event_types: &'static [StripeEventType],
    pub token_hash_key: &'static str,
    pub predicate: EventPredicate,
}

impl WebhookRoute {
    /// Pure check: type claimed, token hash present, predicate holds.
    pub fn supports(&self, event: &StripeEvent) -> bool {
        self.event_types.contains(&event.parsed_type())
            && self.token_hash(event).is_some()
            && (self.predicate)(event)
    }

    /// The local token hash this route correlates on.
    pub fn token_hash<'a>(&self, event: &'a StripeEvent) -> Option<&'a str> {
        event.object_metadata(self.token_hash_key)
    }
}

fn any_object(_event: &StripeEvent) -> bool {
    true
}

fn manual_capture(event: &StripeEvent) -> bool {
    event.capture_method() == Some("manual")
}

fn automatic_capture(event: &StripeEvent) -> bool {
    !manual_capture(event)
}

pub const CHECKOUT_SESSION_COMPLETED: WebhookRoute = WebhookRoute {
    name: "checkout_session_completed",
    event_types: &[
        StripeEventType::CheckoutSessionCompleted,
        StripeEventType::CheckoutSessionAsyncPaymentSucceeded,
        StripeEventType::CheckoutSessionAsyncPaymentFailed,
    ],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: any_object,
};

/// Authorization of a manual-capture intent (funds held, not captured).
pub const PAYMENT_INTENT_MANUAL_SUCCEEDED: WebhookRoute = WebhookRoute {
    name: "payment_intent_manual_succeeded",
    event_types: &[StripeEventType::PaymentIntentSucceeded],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: manual_capture,
};

pub const PAYMENT_INTENT_SUCCEEDED: WebhookRoute = WebhookRoute {
    name: "payment_intent_succeeded",
    event_types: &[StripeEventType::PaymentIntentSucceeded],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: automatic_capture,
};

pub const PAYMENT_INTENT_AMOUNT_CAPTURABLE_UPDATED: WebhookRoute = WebhookRoute {
    name: "payment_intent_amount_capturable_updated",
    event_types: &[StripeEventType::PaymentIntentAmountCapturableUpdated],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: any_object,
};

/// Cancellation initiated by this gateway's own cancel reconciliation.
pub const PAYMENT_INTENT_CANCELED_FROM_CANCEL: WebhookRoute = WebhookRoute {
    name: "payment_intent_canceled_from_cancel",
    event_types: &[StripeEventType::PaymentIntentCanceled],
    token_hash_key: CANCEL_AUTHORIZED_TOKEN_HASH_KEY,
    predicate: any_object,
};

pub const PAYMENT_INTENT_CANCELED: WebhookRoute = WebhookRoute {
    name: "payment_intent_canceled",
    event_types: &[StripeEventType::PaymentIntentCanceled],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: any_object,
};

pub const SETUP_INTENT_SUCCEEDED: WebhookRoute = WebhookRoute {
    name: "setup_intent_succeeded",
    event_types: &[StripeEventType::SetupIntentSucceeded],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: any_object,
};

pub const SETUP_INTENT_CANCELED_FROM_CANCEL: WebhookRoute = WebhookRoute {
    name: "setup_intent_canceled_from_cancel",
    event_types: &[StripeEventType::SetupIntentCanceled],
    token_hash_key: CANCEL_AUTHORIZED_TOKEN_HASH_KEY,
    predicate: any_object,
};

pub const SETUP_INTENT_CANCELED: WebhookRoute = WebhookRoute {
    name: "setup_intent_canceled",
    event_types: &[StripeEventType::SetupIntentCanceled],
    token_hash_key: TOKEN_HASH_KEY,
    predicate: any_object,
};

/// Routes in registration order. Cancel-authorized routes precede their
/// `token_hash` counterparts so a gateway-initiated cancel notifies the
/// cancel's own token.
pub fn default_routes() -> Vec<WebhookRoute> {
    vec![
        CHECKOUT_SESSION_COMPLETED,
        PAYMENT_INTENT_MANUAL_SUCCEEDED,
        PAYMENT_INTENT_SUCCEEDED,
        PAYMENT_INTENT_AMOUNT_CAPTURABLE_UPDATED,
        PAYMENT_INTENT_CANCELED_FROM_CANCEL,
        PAYMENT_INTENT_CANCELED,
        SETUP_INTENT_SUCCEEDED,
        SETUP_INTENT_CANCELED_FROM_CANCEL,
        SETUP_INTENT_CANCELED,
    ]
}
