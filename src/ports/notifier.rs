//! Notification port.
//!
//! The router never changes payment state itself. It hands a [`Notify`]
//! request to the host, whose own notify handling marks orders paid,
//! canceled and so on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::payment::Token;

/// A notification for the payment behind `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notify {
    pub token: Token,
}

impl Notify {
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

/// Port for the host's notification pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: Notify) -> Result<(), DomainError>;
}
