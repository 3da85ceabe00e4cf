//! Local payment model.
//!
//! The host stores payment state as a free-form JSON object that mirrors the
//! Stripe resource it was created from. `PaymentDetails` wraps that object,
//! classifies it once into a [`ModelShape`] and merges remote resources back
//! into it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::{ApiResource, ResourceType};
use crate::domain::foundation::DomainError;

/// What a local payment model refers to remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelShape {
    /// No `object` discriminator or no `id`: nothing exists remotely yet.
    Empty,
    PaymentIntent { id: String },
    SetupIntent { id: String },
    /// An `object` this gateway cannot reconcile.
    Unknown { object: String },
}

impl ModelShape {
    /// Resource type and id for shapes the remote API can act on.
    pub fn resource(&self) -> Option<(ResourceType, &str)> {
        match self {
            ModelShape::PaymentIntent { id } => Some((ResourceType::PaymentIntent, id)),
            ModelShape::SetupIntent { id } => Some((ResourceType::SetupIntent, id)),
            ModelShape::Empty | ModelShape::Unknown { .. } => None,
        }
    }
}

/// Mutable key/value payment document owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentDetails(Map<String, Value>);

impl PaymentDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A string entry of the model's `metadata` map.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.0.get("metadata")?.get(key)?.as_str()
    }

    /// Classifies the model by its `object` discriminator and `id`.
    pub fn shape(&self) -> ModelShape {
        let object = match self.0.get("object").and_then(Value::as_str) {
            Some(object) if !object.is_empty() => object,
            _ => return ModelShape::Empty,
        };
        let id = match self.0.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return ModelShape::Empty,
        };

        match ResourceType::from_object_name(object) {
            Some(ResourceType::PaymentIntent) => ModelShape::PaymentIntent { id },
            Some(ResourceType::SetupIntent) => ModelShape::SetupIntent { id },
            None => ModelShape::Unknown {
                object: object.to_string(),
            },
        }
    }

    /// Replaces top-level keys with the resource's attributes.
    ///
    /// Keys absent from the resource are kept. Applying the same resource
    /// twice gives the same model as applying it once.
    pub fn merge(&mut self, resource: &ApiResource) {
        for (key, value) in resource.attributes() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for PaymentDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for PaymentDetails {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DomainError::validation(
                "model",
                "payment details must be a JSON object",
            )),
        }
    }
}
