//! Payment handlers.
//!
//! ## Commands
//! - Cancelling a payment or setup intent with tag-then-cancel reconciliation

mod cancel_payment;

pub use cancel_payment::{
    CancelError, CancelPaymentCommand, CancelPaymentHandler, CancelPaymentResult, CancelPhase,
    MarkerCheck,
};
