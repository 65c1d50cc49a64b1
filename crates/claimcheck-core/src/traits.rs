//! Trait seams between the claimcheck contexts.
//!
//! - `VerificationService` — the network hop, owned by the relay
//! - `SelectionSource`     — whatever the hosting surface exposes as "selected text"
//!
//! Trigger capture never talks to a `VerificationService` directly; it only
//! holds a `RelayHandle`.

use async_trait::async_trait;

use claimcheck_contracts::{
    error::ClaimcheckResult, outcome::VerificationReport, request::VerificationRequest,
};

/// Performs one verification call against the external service.
///
/// Implementations make exactly one attempt. Transport problems map to
/// `ClaimcheckError::Transport`, unusable bodies to
/// `ClaimcheckError::ResponseFormat`. The relay converts either into a
/// failure outcome, so implementations never need to catch their own errors.
#[async_trait]
pub trait VerificationService: Send + Sync + 'static {
    async fn verify(&self, request: &VerificationRequest) -> ClaimcheckResult<VerificationReport>;
}

/// The current selection on a hosting surface.
///
/// Returns the literal selected text, untrimmed, or `None` when nothing is
/// selected. Trimming and the empty check happen in `VerificationRequest`.
pub trait SelectionSource {
    fn selected_text(&self) -> Option<String>;
}

impl SelectionSource for Option<String> {
    fn selected_text(&self) -> Option<String> {
        self.clone()
    }
}
