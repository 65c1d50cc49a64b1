//! Error types shared by every claimcheck context.
//!
//! Library code returns `ClaimcheckResult<T>`. Only the relay boundary turns
//! an error into a `VerificationOutcome::Failure` string; nothing else
//! crosses a context boundary as an error value.

use thiserror::Error;

/// The unified error type for claimcheck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimcheckError {
    /// No text was selected or entered. Raised locally by trigger capture
    /// and never sent to the network.
    #[error("nothing to verify: no text was selected or entered")]
    EmptyInput,

    /// The verification service could not be reached, timed out, or answered
    /// with a non-success HTTP status.
    #[error("verification request failed: {reason}")]
    Transport { reason: String },

    /// The service answered, but the body was not JSON or lacked required fields.
    #[error("malformed verification response: {reason}")]
    ResponseFormat { reason: String },

    /// The reply port was closed before a reply was delivered.
    #[error("reply channel closed: {reason}")]
    Channel { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A reference scenario observed something other than what it expects.
    #[error("scenario '{name}' failed {failed} check(s)")]
    Scenario { name: String, failed: usize },
}

/// Convenience alias used throughout the claimcheck crates.
pub type ClaimcheckResult<T> = Result<T, ClaimcheckError>;
