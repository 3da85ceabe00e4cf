//! HandleWebhookHandler - Full inbound webhook pipeline (resolve, then dispatch).

use std::sync::Arc;

use super::resolve_webhook_event::ResolveWebhookEventHandler;
use super::webhook_event_router::{DispatchOutcome, WebhookEventRouter};
use crate::domain::webhook::{WebhookError, WebhookTransport};

/// Command to handle one inbound webhook.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    pub transport: WebhookTransport,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleWebhookResult {
    pub event_id: String,
    pub event_type: String,
    pub outcome: DispatchOutcome,
}

/// Handler for inbound Stripe webhooks.
pub struct HandleWebhookHandler {
    resolver: Arc<ResolveWebhookEventHandler>,
    router: Arc<WebhookEventRouter>,
}

impl HandleWebhookHandler {
    pub fn new(resolver: Arc<ResolveWebhookEventHandler>, router: Arc<WebhookEventRouter>) -> Self {
        Self { resolver, router }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<HandleWebhookResult, WebhookError> {
        // 1. Authenticate
        let event_wrapper = self.resolver.resolve(&cmd.transport)?;

        // 2. Route
        let outcome = self.router.dispatch(&event_wrapper).await?;

        let event = event_wrapper.into_event();
        Ok(HandleWebhookResult {
            event_id: event.id,
            event_type: event.event_type,
            outcome,
        })
    }
}
