//! Stripe Gateway - Webhook verification and intent reconciliation
//!
//! This crate authenticates Stripe webhooks against a rotating set of signing
//! secrets, routes verified events to the host's notify pipeline through the
//! local correlation token, and cancels payment and setup intents with a
//! tag-then-cancel protocol that records who authorized the cancel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
