//! Inter-context message schema.
//!
//! Requests flow from trigger capture to the relay; the reply is a
//! [`VerificationOutcome`](crate::outcome::VerificationOutcome). Trigger
//! commands are fire-and-forget and expect no reply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlates one request with its single reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeId(pub uuid::Uuid);

impl ExchangeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A request addressed to the relay: `{ "type": "checkFact", "text": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelayRequest {
    CheckFact { text: String },
}

/// A command dispatched to the active surface: `{ "action": "verifySelectedText" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TriggerCommand {
    VerifySelectedText,
}
