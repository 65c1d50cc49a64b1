//! The request a trigger capture sends to the relay.

use serde::Serialize;

use crate::error::{ClaimcheckError, ClaimcheckResult};

/// A claim to verify.
///
/// Construction trims the input and rejects empty or whitespace-only text,
/// so every value of this type is safe to send over the network. The body
/// serializes as `{ "text": "..." }`, which is exactly the service's POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    text: String,
}

impl VerificationRequest {
    /// Trim `raw` and build a request, or fail with `EmptyInput`.
    pub fn new(raw: &str) -> ClaimcheckResult<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ClaimcheckError::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    /// Like `new`, but accepts an absent selection.
    pub fn from_selection(selection: Option<&str>) -> ClaimcheckResult<Self> {
        Self::new(selection.unwrap_or_default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
