//! The relay: the background context that owns network egress.
//!
//! The relay enforces the exchange contract:
//!
//!   Envelope → validate text → VerificationService::verify → exactly one reply
//!
//! Every envelope is handled on its own task, so a slow verification never
//! delays another requester and identical concurrent requests are verified
//! independently. The relay keeps no state between envelopes.
//!
//! Nothing escapes the boundary: service errors become
//! `VerificationOutcome::Failure`, and a panicking verification task is
//! caught through its `JoinHandle` and reported the same way.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use claimcheck_contracts::{
    message::{ExchangeId, RelayRequest},
    outcome::VerificationOutcome,
    request::VerificationRequest,
};

use crate::channel::{Envelope, RelayHandle};
use crate::traits::VerificationService;

/// The relay actor. Construct with [`Relay::new`], then drive [`Relay::run`]
/// on the runtime that is allowed to reach the network.
pub struct Relay {
    service: Arc<dyn VerificationService>,
    inbox: mpsc::Receiver<Envelope>,
}

impl Relay {
    /// Create a relay around `service` with an inbox of `capacity` envelopes.
    ///
    /// Returns the relay and the first handle; clone the handle for every
    /// surface that needs to send requests.
    pub fn new(service: Arc<dyn VerificationService>, capacity: usize) -> (Self, RelayHandle) {
        let (tx, inbox) = mpsc::channel(capacity.max(1));
        (Self { service, inbox }, RelayHandle::new(tx))
    }

    /// Spawn the relay onto the current tokio runtime.
    pub fn spawn(service: Arc<dyn VerificationService>, capacity: usize) -> RelayHandle {
        let (relay, handle) = Self::new(service, capacity);
        tokio::spawn(relay.run());
        handle
    }

    /// Receive envelopes until every `RelayHandle` has been dropped.
    pub async fn run(mut self) {
        info!("relay started");
        while let Some(envelope) = self.inbox.recv().await {
            let service = Arc::clone(&self.service);
            tokio::spawn(handle_envelope(service, envelope));
        }
        info!("relay inbox closed, shutting down");
    }
}

/// Handle one envelope and send its single reply.
///
/// Returns whether the reply reached the requester.
pub async fn handle_envelope(service: Arc<dyn VerificationService>, envelope: Envelope) -> bool {
    let Envelope {
        exchange_id,
        sent_at,
        request,
        reply,
    } = envelope;

    let outcome = match request {
        RelayRequest::CheckFact { text } => check_fact(service, exchange_id, &text).await,
    };

    let elapsed_ms = (Utc::now() - sent_at).num_milliseconds();
    debug!(
        exchange_id = %exchange_id,
        success = outcome.is_success(),
        elapsed_ms,
        "relay replying"
    );
    reply.send(outcome)
}

async fn check_fact(
    service: Arc<dyn VerificationService>,
    exchange_id: ExchangeId,
    text: &str,
) -> VerificationOutcome {
    // Senders are expected to validate, but the relay accepts messages from
    // any context and re-checks before touching the network.
    let request = match VerificationRequest::new(text) {
        Ok(request) => request,
        Err(e) => {
            warn!(exchange_id = %exchange_id, "rejected empty checkFact request");
            return VerificationOutcome::failure(e.to_string());
        }
    };

    let task = tokio::spawn(async move { service.verify(&request).await });
    match task.await {
        Ok(Ok(report)) => {
            info!(exchange_id = %exchange_id, verdict = %report.verdict, "verification succeeded");
            VerificationOutcome::Success(report)
        }
        Ok(Err(e)) => {
            warn!(exchange_id = %exchange_id, error = %e, "verification failed");
            VerificationOutcome::failure(e.to_string())
        }
        Err(e) => {
            warn!(exchange_id = %exchange_id, error = %e, "verification task aborted");
            VerificationOutcome::failure(format!("verification task failed: {e}"))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
