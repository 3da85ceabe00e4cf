//! Token storage port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::Token;

/// Port for resolving correlation tokens by hash.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Find a token by its hash.
    ///
    /// Returns `Ok(None)` when the hash is unknown (expired, invalidated or
    /// issued by another integration).
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Token>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_storage_is_object_safe() {
        fn _accepts_dyn(_storage: &dyn TokenStorage) {}
    }
}
