//! ResolveWebhookEventHandler - Turns an inbound webhook into a verified event.

use secrecy::SecretString;

use crate::domain::payment::Token;
use crate::domain::webhook::{
    EventWrapper, ResolveError, StripeSignatureVerifier, WebhookTransport,
};

/// Request to convert an inbound webhook into an [`EventWrapper`].
///
/// The result slot is empty until a handler fills it.
#[derive(Debug, Default)]
pub struct ResolveWebhookEvent {
    token: Option<Token>,
    result: Option<EventWrapper>,
}

impl ResolveWebhookEvent {
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token,
            result: None,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn event_wrapper(&self) -> Option<&EventWrapper> {
        self.result.as_ref()
    }

    pub fn set_event_wrapper(&mut self, event_wrapper: EventWrapper) {
        self.result = Some(event_wrapper);
    }

    pub fn into_event_wrapper(self) -> Option<EventWrapper> {
        self.result
    }
}

/// Handler that verifies a webhook against the configured secret set.
///
/// Secrets are tried strictly in configured order and the first one that
/// verifies wins. A secret that fails is never retried.
pub struct ResolveWebhookEventHandler {
    webhook_secrets: Vec<SecretString>,
    verifier: StripeSignatureVerifier,
}

impl ResolveWebhookEventHandler {
    pub fn new(webhook_secrets: Vec<SecretString>, verifier: StripeSignatureVerifier) -> Self {
        Self {
            webhook_secrets,
            verifier,
        }
    }

    /// Fills `request` with the verified event.
    pub fn handle(
        &self,
        request: &mut ResolveWebhookEvent,
        transport: &WebhookTransport,
    ) -> Result<(), ResolveError> {
        let event_wrapper = self.resolve(transport)?;
        request.set_event_wrapper(event_wrapper);
        Ok(())
    }

    /// Verifies the transport's payload and returns the wrapped event.
    ///
    /// # Errors
    ///
    /// - `SignatureRequired` - neither capture strategy carried a signature
    /// - `RequestNotSupported` - no configured secret verified the payload
    pub fn resolve(&self, transport: &WebhookTransport) -> Result<EventWrapper, ResolveError> {
        let signed = transport.extract().ok_or(ResolveError::SignatureRequired)?;

        for (secret_index, secret) in self.webhook_secrets.iter().enumerate() {
            match EventWrapper::verify(&self.verifier, signed.payload, signed.signature, secret) {
                Ok(event_wrapper) => {
                    tracing::debug!(
                        event_id = %event_wrapper.event().id,
                        event_type = %event_wrapper.event().event_type,
                        secret_index,
                        source = ?signed.source,
                        "Webhook signature verified"
                    );
                    return Ok(event_wrapper);
                }
                Err(e) => {
                    tracing::debug!(secret_index, error = %e, "Webhook secret did not verify payload");
                }
            }
        }

        tracing::warn!(
            secrets_tried = self.webhook_secrets.len(),
            source = ?signed.source,
            "No webhook secret verified the payload"
        );
        Err(ResolveError::RequestNotSupported {
            secrets_tried: self.webhook_secrets.len(),
        })
    }
}
