//! Payment domain module.
//!
//! Local payment state and the remote resources it mirrors.
//!
//! # Module Structure
//!
//! - `token` - Correlation tokens and local identities
//! - `resource` - Stripe resource types, API resources and metadata keys
//! - `details` - Local payment model and its shape classification

mod details;
mod resource;
mod token;

pub use details::{ModelShape, PaymentDetails};
pub use resource::{
    ApiResource, ResourceType, CANCEL_AUTHORIZED_TOKEN_HASH_KEY, STATUS_CANCELED, TOKEN_HASH_KEY,
};
pub use token::{Identity, Token};
