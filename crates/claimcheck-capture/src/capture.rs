//! Trigger capture.
//!
//! Every trigger follows the same path:
//!
//!   user action → selected/entered text → VerificationRequest → relay → notification
//!
//! Empty text stops at the second arrow with a local "nothing to verify"
//! notice. Everything after that runs on a spawned task, so the host's event
//! loop is never blocked.
//!
//! The capture holds only a `Weak` reference to its surface. When the
//! surface is dropped (the page went away), in-flight exchanges stop waiting
//! and their replies are discarded by the relay.

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use claimcheck_contracts::{
    chord::KeyChord,
    error::ClaimcheckError,
    message::{ExchangeId, TriggerCommand},
    request::VerificationRequest,
};
use claimcheck_core::{channel::RelayHandle, traits::SelectionSource};
use claimcheck_notify::{
    notification::{Notification, NotificationId},
    surface::{NotificationState, NotificationSurface},
};

/// Which user action started a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Hotkey,
    Control,
    Command,
    ManualEntry,
}

/// Result of a trigger, returned without waiting for the network.
#[derive(Debug)]
pub enum Dispatch {
    /// Nothing to verify, or no surface to report to. No request was sent.
    Rejected,
    /// A request is in flight; the task resolves once its reply is handled.
    Sent(JoinHandle<Delivery>),
}

impl Dispatch {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// True once there is nothing left to wait for.
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Rejected => true,
            Self::Sent(task) => task.is_finished(),
        }
    }

    /// Wait for the exchange to finish. `Rejected` resolves to `None`.
    pub async fn settled(self) -> Option<Delivery> {
        match self {
            Self::Rejected => None,
            Self::Sent(task) => task.await.ok(),
        }
    }
}

/// How an in-flight exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The reply arrived and is on screen.
    Rendered {
        exchange_id: ExchangeId,
        notification_id: NotificationId,
    },
    /// The relay could not be reached or dropped the exchange; an error
    /// notification is on screen instead.
    Failed {
        exchange_id: Option<ExchangeId>,
        notification_id: NotificationId,
    },
    /// The surface went away first; the reply was abandoned.
    Dropped,
}

pub struct TriggerCapture {
    relay: RelayHandle,
    surface: Weak<NotificationSurface>,
    hotkey: KeyChord,
}

impl TriggerCapture {
    pub fn new(relay: RelayHandle, surface: &Arc<NotificationSurface>, hotkey: KeyChord) -> Self {
        Self {
            relay,
            surface: Arc::downgrade(surface),
            hotkey,
        }
    }

    pub fn hotkey(&self) -> KeyChord {
        self.hotkey
    }

    /// Handle a key press. Returns `None` if it is not the configured chord.
    pub fn on_key(
        &self,
        ctrl: bool,
        alt: bool,
        shift: bool,
        key: char,
        selection: &dyn SelectionSource,
    ) -> Option<Dispatch> {
        if !self.hotkey.matches(ctrl, alt, shift, key) {
            return None;
        }
        Some(self.capture(TriggerSource::Hotkey, selection.selected_text()))
    }

    /// Handle activation of the "verify selection" control.
    pub fn on_control(&self, selection: &dyn SelectionSource) -> Dispatch {
        self.capture(TriggerSource::Control, selection.selected_text())
    }

    /// Handle a command dispatched to this surface.
    pub fn on_command(&self, command: TriggerCommand, selection: &dyn SelectionSource) -> Dispatch {
        match command {
            TriggerCommand::VerifySelectedText => {
                self.capture(TriggerSource::Command, selection.selected_text())
            }
        }
    }

    /// Handle submission of the manual entry box.
    pub fn submit(&self, text: &str) -> Dispatch {
        self.capture(TriggerSource::ManualEntry, Some(text.to_string()))
    }

    /// Validate `selected` and, if there is text, start one exchange.
    pub fn capture(&self, source: TriggerSource, selected: Option<String>) -> Dispatch {
        let Some(surface) = self.surface.upgrade() else {
            debug!(?source, "surface is gone, ignoring trigger");
            return Dispatch::Rejected;
        };

        let request = match VerificationRequest::from_selection(selected.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                info!(?source, "nothing to verify");
                surface.show(Notification::from_error(&e));
                return Dispatch::Rejected;
            }
        };

        let teardown = surface.subscribe();
        drop(surface);
        Dispatch::Sent(tokio::spawn(deliver(
            self.relay.clone(),
            self.surface.clone(),
            teardown,
            request,
            source,
        )))
    }
}

async fn deliver(
    relay: RelayHandle,
    surface: Weak<NotificationSurface>,
    teardown: watch::Receiver<NotificationState>,
    request: VerificationRequest,
    source: TriggerSource,
) -> Delivery {
    let pending = match relay.check_fact(&request).await {
        Ok(pending) => pending,
        Err(e) => return report_failure(&surface, None, &e),
    };
    let exchange_id = pending.exchange_id();
    debug!(exchange_id = %exchange_id, ?source, "awaiting reply");

    let outcome = tokio::select! {
        outcome = pending.outcome() => outcome,
        () = surface_closed(teardown) => {
            debug!(exchange_id = %exchange_id, "surface torn down, abandoning exchange");
            return Delivery::Dropped;
        }
    };

    match outcome {
        Ok(outcome) => {
            let Some(surface) = surface.upgrade() else {
                return Delivery::Dropped;
            };
            let notification_id = surface.show(Notification::from_outcome(&outcome));
            Delivery::Rendered {
                exchange_id,
                notification_id,
            }
        }
        Err(e) => report_failure(&surface, Some(exchange_id), &e),
    }
}

/// Show a channel-level failure on a still-living surface.
fn report_failure(
    surface: &Weak<NotificationSurface>,
    exchange_id: Option<ExchangeId>,
    error: &ClaimcheckError,
) -> Delivery {
    let Some(surface) = surface.upgrade() else {
        return Delivery::Dropped;
    };
    warn!(error = %error, "exchange failed before a reply arrived");
    let notification_id = surface.show(Notification::from_error(error));
    Delivery::Failed {
        exchange_id,
        notification_id,
    }
}

/// Resolves once the surface's state channel closes, i.e. the surface is gone.
async fn surface_closed(mut teardown: watch::Receiver<NotificationState>) {
    while teardown.changed().await.is_ok() {}
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use claimcheck_contracts::{
        error::ClaimcheckResult,
        outcome::{ReferenceLink, VerificationReport},
    };
    use claimcheck_core::{traits::VerificationService, Relay};
    use claimcheck_notify::{
        notification::{NotificationKind, ERROR_VERDICT, NO_LINKS_PLACEHOLDER},
        render::{format_alert, OverlayRenderer},
        surface::DisplayTiming,
        tone::Tone,
    };

    use super::*;

    struct StubService {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Semaphore>>,
    }

    impl StubService {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
                gate: None,
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
                gate: None,
            })
        }

        fn gated(gate: Arc<Semaphore>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VerificationService for StubService {
        async fn verify(
            &self,
            request: &VerificationRequest,
        ) -> ClaimcheckResult<VerificationReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate closed").forget();
            }
            if self.fail {
                return Err(ClaimcheckError::Transport {
                    reason: "connection failed: Connection refused (os error 111)".to_string(),
                });
            }
            assert_eq!(request.text(), "The Earth is flat");
            Ok(VerificationReport {
                id: None,
                verdict: "False".to_string(),
                summary: "Contradicted by evidence".to_string(),
                links: vec![ReferenceLink::new("NASA", "https://nasa.gov")],
                extra: Default::default(),
            })
        }
    }

    struct Page {
        capture: TriggerCapture,
        surface: Arc<NotificationSurface>,
        overlay: Arc<OverlayRenderer>,
    }

    fn page(relay: RelayHandle) -> Page {
        let overlay = Arc::new(OverlayRenderer::new());
        let surface = Arc::new(NotificationSurface::new(
            overlay.clone(),
            DisplayTiming::default(),
        ));
        let capture = TriggerCapture::new(relay, &surface, KeyChord::default());
        Page {
            capture,
            surface,
            overlay,
        }
    }

    fn selection(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    #[tokio::test]
    async fn hotkey_with_selection_renders_the_verdict() {
        let service = StubService::ok();
        let page = page(Relay::spawn(service.clone(), 8));

        let dispatch = page
            .capture
            .on_key(true, false, true, 'V', &selection("  The Earth is flat "))
            .expect("chord should match");
        let delivery = dispatch.settled().await.unwrap();
        assert!(matches!(delivery, Delivery::Rendered { .. }), "{delivery:?}");

        let panel = page.overlay.panel().expect("panel should be visible");
        assert_eq!(panel.notification.verdict, "False");
        assert_eq!(panel.notification.tone, Tone::Alert);
        assert_eq!(panel.notification.summary, "Contradicted by evidence");
        assert_eq!(panel.notification.links.len(), 1);
        assert_eq!(panel.notification.links[0].label, "NASA");
        assert!(page.surface.state().is_visible());
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn other_keys_are_ignored() {
        let page = page(Relay::spawn(StubService::ok(), 8));
        assert!(page
            .capture
            .on_key(true, false, false, 'v', &selection("The Earth is flat"))
            .is_none());
        assert!(page.surface.state().is_absent());
    }

    #[tokio::test]
    async fn blank_selection_shows_notice_without_network() {
        let service = StubService::ok();
        let page = page(Relay::spawn(service.clone(), 8));

        for blank in [None, selection(""), selection("  \n\t ")] {
            let dispatch = page.capture.on_control(&blank);
            assert!(dispatch.is_rejected());
            let state = page.surface.state();
            let notice = state.notification().expect("notice should be visible");
            assert_eq!(notice.kind, NotificationKind::Notice);
        }
        assert!(page.capture.submit("   ").is_rejected());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn command_verifies_the_current_selection() {
        let service = StubService::ok();
        let page = page(Relay::spawn(service.clone(), 8));

        let dispatch = page
            .capture
            .on_command(TriggerCommand::VerifySelectedText, &selection("The Earth is flat"));
        assert!(matches!(
            dispatch.settled().await,
            Some(Delivery::Rendered { .. })
        ));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn unreachable_service_shows_error_with_transport_text() {
        let page = page(Relay::spawn(StubService::unreachable(), 8));

        let delivery = page.capture.submit("The Earth is flat").settled().await;
        assert!(matches!(delivery, Some(Delivery::Rendered { .. })));

        let panel = page.overlay.panel().unwrap();
        assert_eq!(panel.notification.verdict, ERROR_VERDICT);
        assert_eq!(panel.notification.tone, Tone::Alert);
        assert!(panel.notification.summary.contains("Connection refused"));
        assert!(format_alert(&panel.notification, false).contains(NO_LINKS_PLACEHOLDER));
    }

    #[tokio::test]
    async fn stopped_relay_is_reported_to_the_user() {
        let (relay, handle) = Relay::new(StubService::ok(), 1);
        drop(relay);
        let page = page(handle);

        let delivery = page.capture.submit("The Earth is flat").settled().await;
        assert!(
            matches!(delivery, Some(Delivery::Failed { exchange_id: None, .. })),
            "{delivery:?}"
        );
        let state = page.surface.state();
        assert_eq!(state.notification().unwrap().verdict, ERROR_VERDICT);
    }

    #[tokio::test]
    async fn repeated_requests_get_independent_outcomes() {
        let service = StubService::ok();
        let page = page(Relay::spawn(service.clone(), 8));

        let first = page.capture.submit("The Earth is flat");
        let second = page.capture.submit("The Earth is flat");
        let (first, second) = tokio::join!(first.settled(), second.settled());

        let ids = |d: Option<Delivery>| match d {
            Some(Delivery::Rendered {
                exchange_id,
                notification_id,
            }) => (exchange_id, notification_id),
            other => panic!("expected rendered delivery, got {other:?}"),
        };
        let (first_exchange, first_note) = ids(first);
        let (second_exchange, second_note) = ids(second);
        assert_ne!(first_exchange, second_exchange);
        assert_ne!(first_note, second_note);
        assert_eq!(service.calls(), 2);

        // Only the later notification is still on screen.
        let latest = first_note.max(second_note);
        assert_eq!(
            page.surface.state().notification().map(|n| n.id),
            Some(latest)
        );
    }

    #[tokio::test]
    async fn reply_after_teardown_is_dropped() {
        let gate = Arc::new(Semaphore::new(0));
        let service = StubService::gated(gate.clone());
        let page = page(Relay::spawn(service.clone(), 8));

        let dispatch = page.capture.submit("The Earth is flat");
        while service.calls() == 0 {
            tokio::task::yield_now().await;
        }

        // The page navigates away while the service is still working.
        let Page {
            capture, surface, ..
        } = page;
        drop(surface);

        let delivery = tokio::time::timeout(Duration::from_secs(5), dispatch.settled())
            .await
            .expect("exchange should be abandoned promptly");
        assert_eq!(delivery, Some(Delivery::Dropped));

        // The relay still finishes the call and discards the reply quietly.
        gate.add_permits(1);
        assert!(capture.submit("The Earth is flat").is_rejected());
    }
}
