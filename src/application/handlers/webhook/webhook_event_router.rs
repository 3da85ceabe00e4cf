//! WebhookEventRouter - Routes verified events to the host's notify pipeline.

use std::sync::Arc;

use super::event_routes::{default_routes, WebhookRoute};
use crate::domain::webhook::{DispatchError, EventWrapper, StripeEvent};
use crate::ports::{Notifier, Notify, TokenStorage};

/// Result of routing one verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route matched, the token was found and the host was notified.
    Notified {
        route: &'static str,
        token_hash: String,
    },
    /// A route matched but no local token has that hash (expired, or issued
    /// by another integration).
    TokenNotFound {
        route: &'static str,
        token_hash: String,
    },
    /// No route claims this event.
    Unhandled,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Notified { .. } => "notified",
            DispatchOutcome::TokenNotFound { .. } => "token_not_found",
            DispatchOutcome::Unhandled => "unhandled",
        }
    }
}

/// Router over an ordered route table.
///
/// Routes are tried strictly in registration order; the first that
/// supports the event claims it. The router authenticates and routes only:
/// payment state changes happen in the host's notify handling.
pub struct WebhookEventRouter {
    routes: Vec<WebhookRoute>,
    token_storage: Arc<dyn TokenStorage>,
    notifier: Arc<dyn Notifier>,
}

impl WebhookEventRouter {
    /// Router over the default route table.
    pub fn new(token_storage: Arc<dyn TokenStorage>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_routes(default_routes(), token_storage, notifier)
    }

    pub fn with_routes(
        routes: Vec<WebhookRoute>,
        token_storage: Arc<dyn TokenStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            routes,
            token_storage,
            notifier,
        }
    }

    /// First route supporting `event`, without side effects.
    pub fn route_for(&self, event: &StripeEvent) -> Option<&WebhookRoute> {
        self.routes.iter().find(|route| route.supports(event))
    }

    pub async fn dispatch(
        &self,
        event_wrapper: &EventWrapper,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event = event_wrapper.event();

        let Some(route) = self.route_for(event) else {
            tracing::debug!(
                event_id = %event.id,
                event_type = %event.event_type,
                "No webhook route claims event"
            );
            return Ok(DispatchOutcome::Unhandled);
        };
        let Some(token_hash) = route.token_hash(event) else {
            return Ok(DispatchOutcome::Unhandled);
        };

        let token = self
            .token_storage
            .find_by_hash(token_hash)
            .await
            .map_err(DispatchError::TokenLookup)?;

        let Some(token) = token else {
            tracing::debug!(
                event_id = %event.id,
                route = route.name,
                "No local token for webhook event"
            );
            return Ok(DispatchOutcome::TokenNotFound {
                route: route.name,
                token_hash: token_hash.to_string(),
            });
        };

        self.notifier
            .notify(Notify::new(token))
            .await
            .map_err(DispatchError::Notification)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            route = route.name,
            "Webhook event dispatched to notify"
        );

        Ok(DispatchOutcome::Notified {
            route: route.name,
            token_hash: token_hash.to_string(),
        })
    }
}
