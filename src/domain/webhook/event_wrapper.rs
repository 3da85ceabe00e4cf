//! Verified webhook event handle.

use secrecy::{ExposeSecret, SecretString};

use super::signature::{StripeSignatureVerifier, VerificationError};
use super::stripe_event::StripeEvent;

/// A Stripe event whose signature has been verified, together with the
/// webhook secret that verified it.
///
/// The only public way to obtain one is [`EventWrapper::verify`], so a
/// wrapper never holds an unverified payload.
#[derive(Debug)]
pub struct EventWrapper {
    webhook_secret: SecretString,
    event: StripeEvent,
}

impl EventWrapper {
    /// Verifies `payload` against one secret and wraps the resulting event.
    pub fn verify(
        verifier: &StripeSignatureVerifier,
        payload: &str,
        signature_header: &str,
        webhook_secret: &SecretString,
    ) -> Result<Self, VerificationError> {
        let event = verifier.verify(payload, signature_header, webhook_secret.expose_secret())?;
        Ok(Self {
            webhook_secret: SecretString::new(webhook_secret.expose_secret().clone()),
            event,
        })
    }

    /// The secret that verified this event.
    pub fn webhook_secret(&self) -> &SecretString {
        &self.webhook_secret
    }

    pub fn event(&self) -> &StripeEvent {
        &self.event
    }

    pub fn into_event(self) -> StripeEvent {
        self.event
    }

    #[cfg(test)]
    pub(crate) fn for_test(webhook_secret: &str, event: StripeEvent) -> Self {
        Self {
            webhook_secret: SecretString::new(webhook_secret.to_string()),
            event,
        }
    }
}
