//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to routing are captured; the resource itself
//! stays an untyped JSON document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stripe webhook event (simplified).
///
/// Contains the essential fields needed for webhook routing.
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event. Null for some legacy events.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<Value>,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }

    /// Returns a top-level field of the event's data object.
    pub fn object_field(&self, key: &str) -> Option<&Value> {
        self.data.object.get(key)
    }

    /// Returns a non-empty string value from the data object's `metadata` map.
    pub fn object_metadata(&self, key: &str) -> Option<&str> {
        self.object_field("metadata")?
            .get(key)?
            .as_str()
            .filter(|value| !value.is_empty())
    }

    /// The `capture_method` of a payment intent object, if any.
    pub fn capture_method(&self) -> Option<&str> {
        self.object_field("capture_method")?.as_str()
    }
}

/// Known Stripe event types that the route table handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed.
    CheckoutSessionCompleted,
    /// Delayed checkout payment succeeded.
    CheckoutSessionAsyncPaymentSucceeded,
    /// Delayed checkout payment failed.
    CheckoutSessionAsyncPaymentFailed,
    /// Payment intent succeeded (captured, or authorized with manual capture).
    PaymentIntentSucceeded,
    /// Payment intent canceled.
    PaymentIntentCanceled,
    /// Authorized amount on a manual-capture intent changed.
    PaymentIntentAmountCapturableUpdated,
    /// Setup intent succeeded.
    SetupIntentSucceeded,
    /// Setup intent canceled.
    SetupIntentCanceled,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "checkout.session.async_payment_succeeded" => {
                Self::CheckoutSessionAsyncPaymentSucceeded
            }
            "checkout.session.async_payment_failed" => Self::CheckoutSessionAsyncPaymentFailed,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.canceled" => Self::PaymentIntentCanceled,
            "payment_intent.amount_capturable_updated" => {
                Self::PaymentIntentAmountCapturableUpdated
            }
            "setup_intent.succeeded" => Self::SetupIntentSucceeded,
            "setup_intent.canceled" => Self::SetupIntentCanceled,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CheckoutSessionAsyncPaymentSucceeded => {
                "checkout.session.async_payment_succeeded"
            }
            Self::CheckoutSessionAsyncPaymentFailed => "checkout.session.async_payment_failed",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentCanceled => "payment_intent.canceled",
            Self::PaymentIntentAmountCapturableUpdated => {
                "payment_intent.amount_capturable_updated"
            }
            Self::SetupIntentSucceeded => "setup_intent.succeeded",
            Self::SetupIntentCanceled => "setup_intent.canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    object: Value,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            object: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: StripeEventType) -> Self {
        self.event_type = event_type.as_str().to_string();
        self
    }

    pub fn object(mut self, object: Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: chrono::Utc::now().timestamp(),
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: false,
            api_version: Some("2020-08-27".to_string()),
        }
    }
}
