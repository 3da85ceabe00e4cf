//! Route configuration for the webhook endpoint.

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{handle_stripe_webhook, WebhookAppState};

/// Creates the webhook router.
///
/// Routes:
/// - `POST /webhooks/stripe` - Verify and route a Stripe webhook
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhooks/stripe", post(handle_stripe_webhook))
        .layer(TraceLayer::new_for_http())
}
