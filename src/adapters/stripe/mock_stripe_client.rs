//! Mock Stripe client for testing.
//!
//! Provides an in-memory implementation of `StripeResourceClient` for unit
//! and integration tests. Supports:
//! - Seeded intents that behave like Stripe's (metadata updates merge by key)
//! - Error injection per method
//! - Call tracking
//! - Simulating a concurrent cancel that overwrites the cancel marker

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::domain::payment::{
    ApiResource, ResourceType, CANCEL_AUTHORIZED_TOKEN_HASH_KEY, STATUS_CANCELED,
};
use crate::ports::{PaymentError, StripeResourceClient};

/// Mock Stripe client for testing.
#[derive(Default, Clone)]
pub struct MockStripeClient {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Intents by type and id.
    resources: HashMap<(ResourceType, String), Map<String, Value>>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Marker written by a simulated concurrent cancel.
    racing_marker: Option<String>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub resource: ResourceType,
    pub id: String,
    pub params: Option<Value>,
}

impl MockStripeClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Seed an intent with the given status.
    pub fn add_intent(&self, resource: ResourceType, id: impl Into<String>, status: &str) {
        let id = id.into();
        let attributes = json!({
            "id": id,
            "object": resource.object_name(),
            "status": status,
            "metadata": {},
        });
        if let Value::Object(attributes) = attributes {
            self.state().resources.insert((resource, id), attributes);
        }
    }

    /// Fail every call of `method` ("update" or "cancel") with `error`.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Overwrite the cancel marker with `hash` just before a cancel completes.
    pub fn simulate_racing_cancel(&self, hash: impl Into<String>) {
        self.state().racing_marker = Some(hash.into());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|call| call.method == method)
    }

    /// Current remote state of an intent.
    pub fn intent(&self, resource: ResourceType, id: &str) -> Option<ApiResource> {
        self.state()
            .resources
            .get(&(resource, id.to_string()))
            .cloned()
            .map(ApiResource::new)
    }

    fn record(
        state: &mut MockState,
        method: &str,
        resource: ResourceType,
        id: &str,
        params: Option<Value>,
    ) -> Result<(), PaymentError> {
        state.call_log.push(MethodCall {
            method: method.to_string(),
            resource,
            id: id.to_string(),
            params,
        });
        match state.method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StripeResourceClient for MockStripeClient {
    async fn update(
        &self,
        resource: ResourceType,
        id: &str,
        params: Value,
    ) -> Result<ApiResource, PaymentError> {
        let mut state = self.state();
        Self::record(&mut state, "update", resource, id, Some(params.clone()))?;

        let stored = state
            .resources
            .get_mut(&(resource, id.to_string()))
            .ok_or_else(|| PaymentError::not_found(&format!("{} {}", resource, id)))?;

        if let Value::Object(params) = params {
            for (key, value) in params {
                match value {
                    Value::Object(entries) if key == "metadata" => {
                        let metadata = stored
                            .entry("metadata")
                            .or_insert_with(|| Value::Object(Map::new()));
                        if let Value::Object(metadata) = metadata {
                            metadata.extend(entries);
                        }
                    }
                    value => {
                        stored.insert(key, value);
                    }
                }
            }
        }

        Ok(ApiResource::new(stored.clone()))
    }

    async fn cancel(&self, resource: ResourceType, id: &str) -> Result<ApiResource, PaymentError> {
        let mut state = self.state();
        Self::record(&mut state, "cancel", resource, id, None)?;

        let racing_marker = state.racing_marker.clone();
        let stored = state
            .resources
            .get_mut(&(resource, id.to_string()))
            .ok_or_else(|| PaymentError::not_found(&format!("{} {}", resource, id)))?;

        if let Some(hash) = racing_marker {
            if let Some(Value::Object(metadata)) = stored.get_mut("metadata") {
                metadata.insert(CANCEL_AUTHORIZED_TOKEN_HASH_KEY.to_string(), Value::String(hash));
            }
        }
        stored.insert("status".to_string(), Value::String(STATUS_CANCELED.to_string()));

        Ok(ApiResource::new(stored.clone()))
    }
}
