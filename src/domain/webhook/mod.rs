//! Webhook domain module.
//!
//! Everything needed to authenticate an inbound Stripe webhook and hand a
//! typed, verified event to the router.
//!
//! # Module Structure
//!
//! - `stripe_event` - Event document and known event types
//! - `signature` - `Stripe-Signature` parsing and HMAC verification
//! - `event_wrapper` - Verified event paired with the secret that verified it
//! - `transport` - Bridged and ambient capture strategies
//! - `errors` - Resolution, dispatch and pipeline errors

mod errors;
mod event_wrapper;
mod signature;
mod stripe_event;
mod transport;

pub use errors::{DispatchError, ResolveError, WebhookError};
pub use event_wrapper::EventWrapper;
pub use signature::{
    compute_signature, SignatureHeader, StripeSignatureVerifier, VerificationError,
    DEFAULT_TOLERANCE_SECS,
};
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use transport::{
    AmbientRequest, BridgedRequest, SignatureSource, SignedPayload, WebhookTransport,
    SIGNATURE_HEADER, SIGNATURE_SERVER_VAR,
};

#[cfg(test)]
pub(crate) use stripe_event::StripeEventBuilder;
