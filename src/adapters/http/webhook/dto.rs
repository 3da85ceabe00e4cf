//! Response DTOs for the webhook endpoint.

use serde::{Deserialize, Serialize};

use crate::application::{DispatchOutcome, HandleWebhookResult};

/// Body returned once a webhook has been verified and routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub event_id: String,
    pub event_type: String,
    /// "notified", "token_not_found" or "unhandled".
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl From<HandleWebhookResult> for WebhookResponse {
    fn from(result: HandleWebhookResult) -> Self {
        let route = match &result.outcome {
            DispatchOutcome::Notified { route, .. } | DispatchOutcome::TokenNotFound { route, .. } => {
                Some(route.to_string())
            }
            DispatchOutcome::Unhandled => None,
        };
        Self {
            event_id: result.event_id,
            event_type: result.event_type,
            outcome: result.outcome.as_str().to_string(),
            route,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
