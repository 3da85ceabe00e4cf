//! CancelPaymentHandler - Cancels a payment or setup intent and reconciles
//! the local model.
//!
//! Cancellation runs in two remote calls that are not atomic:
//!
//! 1. **Tag**: write a freshly minted notify token's hash into the intent's
//!    `metadata.cancel_authorized_token_hash`
//! 2. **Cancel**: cancel the intent
//!
//! Each returned resource is merged into the local model. The
//! `payment_intent.canceled` webhook later carries the marker, which lets
//! the router notify the token minted here rather than the originating one.
//! Concurrent cancels on the same intent are not locked out; a race shows up
//! as a marker mismatch in the result.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{
    ModelShape, PaymentDetails, ResourceType, Token, CANCEL_AUTHORIZED_TOKEN_HASH_KEY,
};
use crate::ports::{PaymentError, StripeResourceClient, TokenFactory};

/// Command to cancel the remote intent behind a local payment model.
#[derive(Debug, Clone, Default)]
pub struct CancelPaymentCommand {
    /// Token of the request that asked for the cancel.
    pub token: Option<Token>,
    /// Local model, mutated in place.
    pub model: Option<PaymentDetails>,
}

impl CancelPaymentCommand {
    pub fn new(token: Option<Token>, model: PaymentDetails) -> Self {
        Self {
            token,
            model: Some(model),
        }
    }

    /// Any model is accepted; eligibility is decided while executing.
    pub fn supports(&self) -> bool {
        self.model.is_some()
    }
}

/// Whether the marker returned by the cancel call is the one written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerCheck {
    Confirmed,
    /// Another cancel overwrote the marker between the two calls, or Stripe
    /// returned the resource without it.
    Mismatch {
        expected: String,
        found: Option<String>,
    },
}

/// Result of a cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelPaymentResult {
    /// Nothing to reconcile remotely; no call was made.
    Skipped { shape: ModelShape },
    Canceled {
        resource: ResourceType,
        id: String,
        notify_token: Token,
        marker: MarkerCheck,
    },
}

/// Remote call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPhase {
    Tag,
    Cancel,
}

impl fmt::Display for CancelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelPhase::Tag => f.write_str("tag"),
            CancelPhase::Cancel => f.write_str("cancel"),
        }
    }
}

/// Errors from cancel reconciliation.
#[derive(Debug, Clone, Error)]
pub enum CancelError {
    #[error("Request not supported: cancel requires a payment model")]
    RequestNotSupported,

    #[error("The request token should not be null!")]
    TokenRequired,

    #[error("Notify token could not be created: {0}")]
    TokenFactory(DomainError),

    /// A failure in the cancel phase leaves the intent tagged but not canceled.
    #[error("Stripe {phase} call failed for {resource} {id}: {source}")]
    Remote {
        phase: CancelPhase,
        resource: ResourceType,
        id: String,
        #[source]
        source: PaymentError,
    },
}

impl CancelError {
    /// True when retrying the whole cancel may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CancelError::Remote { source, .. } => source.retryable,
            CancelError::TokenFactory(err) => err.code.is_retryable(),
            CancelError::RequestNotSupported | CancelError::TokenRequired => false,
        }
    }
}

/// Handler for cancel reconciliation.
pub struct CancelPaymentHandler {
    client: Arc<dyn StripeResourceClient>,
    token_factory: Arc<dyn TokenFactory>,
}

impl CancelPaymentHandler {
    pub fn new(client: Arc<dyn StripeResourceClient>, token_factory: Arc<dyn TokenFactory>) -> Self {
        Self {
            client,
            token_factory,
        }
    }

    pub async fn handle(
        &self,
        cmd: &mut CancelPaymentCommand,
    ) -> Result<CancelPaymentResult, CancelError> {
        let model = cmd.model.as_mut().ok_or(CancelError::RequestNotSupported)?;

        // 1. Nothing created remotely yet
        let shape = model.shape();
        if shape == ModelShape::Empty {
            tracing::debug!("Cancel skipped, no remote intent");
            return Ok(CancelPaymentResult::Skipped { shape });
        }

        // 2. Cancellation must be attributable to a request
        let token = cmd.token.as_ref().ok_or(CancelError::TokenRequired)?;

        // 3. Only payment and setup intents can be canceled here
        let target = shape.resource().map(|(resource, id)| (resource, id.to_string()));
        let Some((resource, id)) = target else {
            tracing::debug!(shape = ?shape, "Cancel skipped, unknown resource type");
            return Ok(CancelPaymentResult::Skipped { shape });
        };

        // 4. Mint the token the cancel webhook will notify
        let notify_token = self
            .token_factory
            .create_notify_token(&token.gateway_name, token.details.as_ref())
            .await
            .map_err(CancelError::TokenFactory)?;

        // 5. Tag
        let params = json!({
            "metadata": { CANCEL_AUTHORIZED_TOKEN_HASH_KEY: notify_token.hash }
        });
        let tagged = self
            .client
            .update(resource, &id, params)
            .await
            .map_err(|source| remote_failure(CancelPhase::Tag, resource, &id, source))?;
        model.merge(&tagged);

        // 6. Cancel
        let canceled = self
            .client
            .cancel(resource, &id)
            .await
            .map_err(|source| remote_failure(CancelPhase::Cancel, resource, &id, source))?;
        model.merge(&canceled);

        // 7. Marker check
        let found = canceled.metadata(CANCEL_AUTHORIZED_TOKEN_HASH_KEY);
        let marker = if found == Some(notify_token.hash.as_str()) {
            MarkerCheck::Confirmed
        } else {
            tracing::warn!(
                resource = %resource,
                payment_id = %id,
                expected = %notify_token.hash,
                found = ?found,
                "Cancel marker mismatch, a concurrent cancel may have raced"
            );
            MarkerCheck::Mismatch {
                expected: notify_token.hash.clone(),
                found: found.map(str::to_string),
            }
        };

        tracing::info!(
            resource = %resource,
            payment_id = %id,
            status = ?canceled.status(),
            "Intent canceled"
        );

        Ok(CancelPaymentResult::Canceled {
            resource,
            id,
            notify_token,
            marker,
        })
    }
}

fn remote_failure(
    phase: CancelPhase,
    resource: ResourceType,
    id: &str,
    source: PaymentError,
) -> CancelError {
    tracing::error!(
        phase = %phase,
        resource = %resource,
        payment_id = %id,
        error = %source,
        "Stripe call failed during cancel"
    );
    CancelError::Remote {
        phase,
        resource,
        id: id.to_string(),
        source,
    }
}
