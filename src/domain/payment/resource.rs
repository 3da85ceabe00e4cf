//! Remote Stripe resources the gateway reconciles against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the token hash of the originating request.
pub const TOKEN_HASH_KEY: &str = "token_hash";

/// Metadata key carrying the notify token hash written before a cancel.
pub const CANCEL_AUTHORIZED_TOKEN_HASH_KEY: &str = "cancel_authorized_token_hash";

/// Status Stripe reports on a canceled intent.
pub const STATUS_CANCELED: &str = "canceled";

/// Remote resource types with an update and a cancel endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    PaymentIntent,
    SetupIntent,
}

impl ResourceType {
    /// Parses Stripe's `object` discriminator.
    pub fn from_object_name(object: &str) -> Option<Self> {
        match object {
            "payment_intent" => Some(Self::PaymentIntent),
            "setup_intent" => Some(Self::SetupIntent),
            _ => None,
        }
    }

    /// Stripe's `object` discriminator.
    pub fn object_name(&self) -> &'static str {
        match self {
            Self::PaymentIntent => "payment_intent",
            Self::SetupIntent => "setup_intent",
        }
    }

    /// Collection segment in the REST API path.
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::PaymentIntent => "payment_intents",
            Self::SetupIntent => "setup_intents",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.object_name())
    }
}

/// Full serialized attribute map of a resource returned by the Stripe API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiResource(Map<String, Value>);

impl ApiResource {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// A string entry of the resource's `metadata` map.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.0.get("metadata")?.get(key)?.as_str()
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ApiResource {
    fn from(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }
}
