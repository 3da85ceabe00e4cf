//! Token adapters.
//!
//! - `InMemoryTokenStore` - Token lookup and notify-token minting in process

mod in_memory_token_store;

pub use in_memory_token_store::InMemoryTokenStore;
