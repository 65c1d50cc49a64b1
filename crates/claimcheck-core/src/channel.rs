//! Correlated request/reply messaging between contexts.
//!
//! Each request travels in an [`Envelope`] that carries a one-shot
//! [`ReplyPort`]. The requester keeps the matching [`PendingExchange`].
//!
//! The port is consumed by `send`, so a second reply cannot be expressed.
//! Because the port moves with the envelope into whatever task handles it,
//! the reply channel stays open for as long as that task runs; it closes
//! only when a reply is sent or the handling task is dropped.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use claimcheck_contracts::{
    error::{ClaimcheckError, ClaimcheckResult},
    message::{ExchangeId, RelayRequest},
    outcome::VerificationOutcome,
    request::VerificationRequest,
};

/// A request in flight to the relay.
#[derive(Debug)]
pub struct Envelope {
    pub exchange_id: ExchangeId,
    pub sent_at: DateTime<Utc>,
    pub request: RelayRequest,
    pub reply: ReplyPort,
}

/// The relay's half of an exchange. Delivers at most one reply.
#[derive(Debug)]
pub struct ReplyPort {
    exchange_id: ExchangeId,
    tx: oneshot::Sender<VerificationOutcome>,
}

impl ReplyPort {
    /// Deliver the reply.
    ///
    /// Returns `false` when the requester is gone. That is not an error: the
    /// reply is dropped and nothing is retained.
    pub fn send(self, outcome: VerificationOutcome) -> bool {
        match self.tx.send(outcome) {
            Ok(()) => true,
            Err(_) => {
                debug!(exchange_id = %self.exchange_id, "requester gone, reply dropped");
                false
            }
        }
    }

    /// True once the requester has dropped its `PendingExchange`.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn exchange_id(&self) -> ExchangeId {
        self.exchange_id
    }
}

/// The requester's half of an exchange.
#[derive(Debug)]
pub struct PendingExchange {
    exchange_id: ExchangeId,
    rx: oneshot::Receiver<VerificationOutcome>,
}

impl PendingExchange {
    pub fn exchange_id(&self) -> ExchangeId {
        self.exchange_id
    }

    /// Wait for the single correlated reply.
    ///
    /// Fails with `ClaimcheckError::Channel` if the relay dropped the port
    /// without replying.
    pub async fn outcome(self) -> ClaimcheckResult<VerificationOutcome> {
        let exchange_id = self.exchange_id;
        self.rx.await.map_err(|_| ClaimcheckError::Channel {
            reason: format!("no reply for exchange {exchange_id}"),
        })
    }
}

/// Open a new exchange for `request`.
pub fn exchange(request: RelayRequest) -> (Envelope, PendingExchange) {
    let exchange_id = ExchangeId::new();
    let (tx, rx) = oneshot::channel();
    let envelope = Envelope {
        exchange_id,
        sent_at: Utc::now(),
        request,
        reply: ReplyPort { exchange_id, tx },
    };
    (envelope, PendingExchange { exchange_id, rx })
}

/// Cloneable sender side of the relay inbox. Every surface holds one.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<Envelope>,
}

impl RelayHandle {
    pub(crate) fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    /// Post `request` to the relay and return the pending exchange.
    ///
    /// Fails with `ClaimcheckError::Channel` when the relay is not running.
    pub async fn send(&self, request: RelayRequest) -> ClaimcheckResult<PendingExchange> {
        let (envelope, pending) = exchange(request);
        let exchange_id = envelope.exchange_id;
        self.tx.send(envelope).await.map_err(|_| ClaimcheckError::Channel {
            reason: format!("relay is not running; exchange {exchange_id} was not delivered"),
        })?;
        debug!(exchange_id = %exchange_id, "request posted to relay");
        Ok(pending)
    }

    /// Post a `checkFact` request.
    pub async fn check_fact(&self, request: &VerificationRequest) -> ClaimcheckResult<PendingExchange> {
        self.send(RelayRequest::CheckFact {
            text: request.text().to_string(),
        })
        .await
    }

    /// Post a `checkFact` request and wait for its outcome.
    pub async fn request_outcome(
        &self,
        request: &VerificationRequest,
    ) -> ClaimcheckResult<VerificationOutcome> {
        self.check_fact(request).await?.outcome().await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> RelayRequest {
        RelayRequest::CheckFact {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn reply_reaches_the_matching_requester() {
        let (envelope, pending) = exchange(check("claim"));
        assert_eq!(envelope.exchange_id, pending.exchange_id());
        assert_eq!(envelope.reply.exchange_id(), pending.exchange_id());

        assert!(envelope.reply.send(VerificationOutcome::failure("boom")));
        assert_eq!(
            pending.outcome().await.unwrap(),
            VerificationOutcome::failure("boom")
        );
    }

    #[tokio::test]
    async fn reply_to_a_dropped_requester_is_discarded() {
        let (envelope, pending) = exchange(check("claim"));
        drop(pending);
        assert!(envelope.reply.is_closed());
        assert!(!envelope.reply.send(VerificationOutcome::failure("late")));
    }

    #[tokio::test]
    async fn dropped_port_surfaces_channel_error() {
        let (envelope, pending) = exchange(check("claim"));
        drop(envelope);
        let err = pending.outcome().await.unwrap_err();
        assert!(matches!(err, ClaimcheckError::Channel { .. }));
    }

    #[tokio::test]
    async fn send_fails_when_relay_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let handle = RelayHandle::new(tx);
        drop(rx);
        assert!(handle.is_closed());

        let request = VerificationRequest::new("claim").unwrap();
        let err = handle.check_fact(&request).await.unwrap_err();
        assert!(matches!(err, ClaimcheckError::Channel { .. }));
    }
}
