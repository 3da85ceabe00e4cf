//! Token factory port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{Identity, Token};

/// Port for minting tokens on behalf of the host.
#[async_trait]
pub trait TokenFactory: Send + Sync {
    /// Mint a notify token for `gateway_name` scoped to the same local model
    /// as `details`. The returned token has a fresh hash and its own target URL.
    async fn create_notify_token(
        &self,
        gateway_name: &str,
        details: Option<&Identity>,
    ) -> Result<Token, DomainError>;
}
