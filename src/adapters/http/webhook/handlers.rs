//! HTTP handlers for the webhook endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::{
    HandleWebhookCommand, HandleWebhookHandler, ResolveWebhookEventHandler, WebhookEventRouter,
};
use crate::config::AppConfig;
use crate::domain::webhook::{BridgedRequest, WebhookError, WebhookTransport};
use crate::ports::{Notifier, TokenStorage};

use super::dto::{ErrorResponse, WebhookResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook endpoint.
#[derive(Clone)]
pub struct WebhookAppState {
    pub handler: Arc<HandleWebhookHandler>,
}

impl WebhookAppState {
    pub fn new(handler: Arc<HandleWebhookHandler>) -> Self {
        Self { handler }
    }

    /// Wire the pipeline from configuration and the host's ports.
    pub fn from_config(
        config: &AppConfig,
        token_storage: Arc<dyn TokenStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let resolver = ResolveWebhookEventHandler::new(
            config.stripe.webhook_secrets(),
            config.stripe.verifier(),
        );
        let router = WebhookEventRouter::new(token_storage, notifier);
        Self::new(Arc::new(HandleWebhookHandler::new(
            Arc::new(resolver),
            Arc::new(router),
        )))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/stripe - Handle Stripe webhook events
pub async fn handle_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let cmd = HandleWebhookCommand {
        transport: WebhookTransport::bridged(bridge_request(&headers, &body)),
    };

    let result = state.handler.handle(cmd).await?;

    Ok(Json(WebhookResponse::from(result)))
}

/// Copies every header (all values, in order) and the raw body.
fn bridge_request(headers: &HeaderMap, body: &Bytes) -> BridgedRequest {
    let mut request = BridgedRequest::new(String::from_utf8_lossy(body).into_owned());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    request
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts pipeline errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.code(), "Webhook dispatch failed");
        } else {
            tracing::warn!(error = %self.0, code = self.0.code(), "Webhook rejected");
        }

        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bridge_request_keeps_body_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("stripe-signature", HeaderValue::from_static("t=1,v1=aa"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        let request = bridge_request(&headers, &Bytes::from_static(b"{\"id\":\"evt_1\"}"));

        assert_eq!(request.content(), "{\"id\":\"evt_1\"}");
        assert_eq!(request.header("Stripe-Signature"), Some("t=1,v1=aa"));
        assert_eq!(request.header("x-forwarded-for"), Some("10.0.0.1"));
    }

    #[test]
    fn non_utf8_body_is_replaced_lossily() {
        let request = bridge_request(&HeaderMap::new(), &Bytes::from_static(&[0xff, b'a']));

        assert_eq!(request.content(), "\u{fffd}a");
    }
}
