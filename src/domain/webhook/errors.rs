//! Webhook error types.
//!
//! Resolution and dispatch fail in different ways and are kept apart:
//! a missing signature is a deployment mistake, an unverifiable payload is
//! a routing signal, and dispatch failures come from the token store or the
//! notification pipeline. [`WebhookError`] joins them for the HTTP surface,
//! with status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors raised while turning a transport request into an event wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Neither capture strategy carried a signature.
    #[error("A Stripe signature is required!")]
    SignatureRequired,

    /// No configured secret verified the payload. Not a crash: this handler
    /// chain simply cannot process the request.
    #[error("Request not supported: no webhook secret verified the payload ({secrets_tried} tried)")]
    RequestNotSupported { secrets_tried: usize },
}

impl ResolveError {
    /// True for operator or integrator mistakes that retrying will not fix.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ResolveError::SignatureRequired)
    }
}

/// Errors raised while a matched route executes.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The token store could not be queried.
    #[error("Token lookup failed: {0}")]
    TokenLookup(DomainError),

    /// The notification could not be handed to the host.
    #[error("Notification failed: {0}")]
    Notification(DomainError),
}

/// Errors of the complete webhook pipeline.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Dispatch(_))
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine Stripe's retry behavior:
    /// - 4xx: Client error, no retry expected to help
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Resolve(ResolveError::SignatureRequired) => StatusCode::BAD_REQUEST,
            WebhookError::Resolve(ResolveError::RequestNotSupported { .. }) => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::Resolve(ResolveError::SignatureRequired) => "SIGNATURE_REQUIRED",
            WebhookError::Resolve(ResolveError::RequestNotSupported { .. }) => {
                "REQUEST_NOT_SUPPORTED"
            }
            WebhookError::Dispatch(DispatchError::TokenLookup(_)) => "TOKEN_LOOKUP_FAILED",
            WebhookError::Dispatch(DispatchError::Notification(_)) => "NOTIFICATION_FAILED",
        }
    }
}
