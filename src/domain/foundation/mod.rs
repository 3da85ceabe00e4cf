//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary shared by the webhook and payment domains.

mod errors;

pub use errors::{DomainError, ErrorCode};
