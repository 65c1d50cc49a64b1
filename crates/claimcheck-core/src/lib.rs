//! # claimcheck-core
//!
//! The cross-context plumbing of claimcheck.
//!
//! This crate provides:
//! - The context traits (`VerificationService`, `SelectionSource`)
//! - A correlated request/reply channel with a single-reply contract
//! - The `Relay` actor, the only context allowed to reach the network
//!
//! ## Usage
//!
//! ```rust,ignore
//! use claimcheck_core::{Relay, channel::RelayHandle};
//!
//! let (relay, handle) = Relay::new(Arc::new(client), 32);
//! tokio::spawn(relay.run());
//! let outcome = handle.request_outcome(&request).await?;
//! ```

pub mod channel;
pub mod relay;
pub mod traits;

pub use channel::RelayHandle;
pub use relay::Relay;
