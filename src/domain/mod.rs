//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared error vocabulary
//! - `webhook` - Signature verification, verified events and transport capture
//! - `payment` - Tokens, remote resources and the local payment model

pub mod foundation;
pub mod payment;
pub mod webhook;
