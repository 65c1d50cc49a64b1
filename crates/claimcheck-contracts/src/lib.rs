//! # claimcheck-contracts
//!
//! Shared types, wire messages, configuration, and errors for claimcheck.
//!
//! Every context (trigger capture, relay, notification surface) imports from
//! here. No behavior lives in this crate beyond construction-time validation.

pub mod chord;
pub mod config;
pub mod error;
pub mod message;
pub mod outcome;
pub mod request;
