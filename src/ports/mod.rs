//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway core and the host framework or Stripe. Adapters implement
//! these ports.
//!
//! ## Host Ports
//!
//! - `TokenStorage` - Resolve a token by hash
//! - `TokenFactory` - Mint notify tokens
//! - `Notifier` - Hand `Notify` requests to the host
//!
//! ## Remote Ports
//!
//! - `StripeResourceClient` - Update and cancel payment/setup intents

mod notifier;
mod stripe_resources;
mod token_factory;
mod token_storage;

pub use notifier::{Notifier, Notify};
pub use stripe_resources::{PaymentError, PaymentErrorCode, StripeResourceClient};
pub use token_factory::TokenFactory;
pub use token_storage::TokenStorage;
