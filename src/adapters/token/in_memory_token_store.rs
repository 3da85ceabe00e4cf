//! In-Memory Token Store Adapter
//!
//! Stores correlation tokens in memory and mints new notify tokens.
//! Meant for tests and single-process development hosts: tokens live until
//! invalidated, and growth is only bounded when a capacity is set with
//! [`InMemoryTokenStore::with_capacity`]. Production hosts plug their own
//! persistent `TokenStorage`.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{Identity, Token};
use crate::ports::{TokenFactory, TokenStorage};

#[derive(Debug, Default)]
struct Tokens {
    by_hash: HashMap<String, Token>,
    /// Hashes in insertion order, oldest first.
    order: VecDeque<String>,
}

/// In-memory token storage and factory
#[derive(Debug, Clone)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<Tokens>>,
    notify_base_url: String,
    capacity: Option<usize>,
}

impl InMemoryTokenStore {
    /// Create a store whose minted notify tokens target `{notify_base_url}/{hash}`
    pub fn new(notify_base_url: impl Into<String>) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Tokens::default())),
            notify_base_url: notify_base_url.into(),
            capacity: None,
        }
    }

    /// Keep at most `capacity` tokens, evicting the oldest first.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    /// Store a token issued elsewhere (e.g. by a capture request)
    pub async fn insert(&self, token: Token) {
        let mut tokens = self.tokens.write().await;
        let hash = token.hash.clone();
        if tokens.by_hash.insert(hash.clone(), token).is_some() {
            tokens.order.retain(|h| h != &hash);
        }
        tokens.order.push_back(hash);

        if let Some(capacity) = self.capacity {
            while tokens.by_hash.len() > capacity {
                let Some(oldest) = tokens.order.pop_front() else {
                    break;
                };
                tokens.by_hash.remove(&oldest);
                tracing::debug!(token_hash = %oldest, "Evicted token at capacity");
            }
        }
    }

    /// Invalidate a token by hash, returning it if it was stored
    pub async fn invalidate(&self, hash: &str) -> Option<Token> {
        let mut tokens = self.tokens.write().await;
        let removed = tokens.by_hash.remove(hash);
        if removed.is_some() {
            tokens.order.retain(|h| h != hash);
        }
        removed
    }

    /// Get the number of stored tokens
    pub async fn len(&self) -> usize {
        self.tokens.read().await.by_hash.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.by_hash.is_empty()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStore {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.by_hash.get(hash).cloned())
    }
}

#[async_trait]
impl TokenFactory for InMemoryTokenStore {
    async fn create_notify_token(
        &self,
        gateway_name: &str,
        details: Option<&Identity>,
    ) -> Result<Token, DomainError> {
        let hash = Uuid::new_v4().simple().to_string();
        let target_url = format!("{}/{}", self.notify_base_url.trim_end_matches('/'), hash);

        let mut token = Token::new(hash, gateway_name, target_url);
        if let Some(details) = details {
            token = token.with_details(details.clone());
        }

        self.insert(token.clone()).await;
        tracing::debug!(
            token_hash = %token.hash,
            gateway = gateway_name,
            "Minted notify token"
        );
        Ok(token)
    }
}
