//! Local correlation tokens.

use serde::{Deserialize, Serialize};

/// Reference to a locally stored payment model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Storage identifier of the model.
    pub id: String,
    /// Model class (e.g. "Payment"), used by the host to pick a storage.
    pub class: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
        }
    }
}

/// Opaque handle linking a remote event or request back to a local payment.
///
/// Stripe objects carry the hash in their `metadata`; the router resolves it
/// back to a token through `TokenStorage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub hash: String,
    pub gateway_name: String,
    pub details: Option<Identity>,
    pub target_url: String,
    pub after_url: Option<String>,
}

impl Token {
    pub fn new(
        hash: impl Into<String>,
        gateway_name: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            gateway_name: gateway_name.into(),
            details: None,
            target_url: target_url.into(),
            after_url: None,
        }
    }

    pub fn with_details(mut self, details: Identity) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_after_url(mut self, after_url: impl Into<String>) -> Self {
        self.after_url = Some(after_url.into());
        self
    }
}
