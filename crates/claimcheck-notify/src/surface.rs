//! The notification surface: one transient notification at a time.
//!
//! Lifecycle: `Absent → Visible → Fading → Absent`.
//!
//! - `show` replaces whatever is on screen. The previous notification is
//!   removed (renderer `remove`) before the new one is shown, and its
//!   retirement timer is aborted.
//! - After `dwell` the notification starts fading; `fade` later it is gone.
//!
//! State is published on a `watch` channel so hosts and tests can observe it
//! without touching the renderer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use claimcheck_contracts::config::NotificationConfig;

use crate::notification::{Notification, NotificationId};
use crate::render::NotificationRenderer;

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationState {
    Absent,
    Visible(Notification),
    Fading(Notification),
}

impl NotificationState {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Absent => None,
            Self::Visible(n) | Self::Fading(n) => Some(n),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    pub fn is_fading(&self) -> bool {
        matches!(self, Self::Fading(_))
    }
}

/// Dwell and fade durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTiming {
    pub dwell: Duration,
    pub fade: Duration,
}

impl Default for DisplayTiming {
    fn default() -> Self {
        NotificationConfig::default().into()
    }
}

impl From<NotificationConfig> for DisplayTiming {
    fn from(config: NotificationConfig) -> Self {
        Self {
            dwell: config.dwell(),
            fade: config.fade(),
        }
    }
}

pub struct NotificationSurface {
    renderer: Arc<dyn NotificationRenderer>,
    timing: DisplayTiming,
    state: Arc<watch::Sender<NotificationState>>,
    /// Timer task retiring the current notification.
    retirement: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationSurface {
    pub fn new(renderer: Arc<dyn NotificationRenderer>, timing: DisplayTiming) -> Self {
        let (state, _) = watch::channel(NotificationState::Absent);
        Self {
            renderer,
            timing,
            state: Arc::new(state),
            retirement: Mutex::new(None),
        }
    }

    /// Show `notification`, replacing any current one.
    ///
    /// Must be called from within a tokio runtime; the retirement timer is
    /// spawned onto it.
    pub fn show(&self, notification: Notification) -> NotificationId {
        let mut retirement = self.retirement.lock().expect("retirement lock poisoned");
        if let Some(timer) = retirement.take() {
            timer.abort();
        }

        let previous = self.state.send_replace(NotificationState::Absent);
        if let Some(previous) = previous.notification() {
            debug!(replaced = %previous.id, "removing current notification");
            self.renderer.remove(previous.id);
        }

        let id = notification.id;
        debug!(id = %id, verdict = %notification.verdict, "showing notification");
        self.renderer.show(&notification);
        self.state.send_replace(NotificationState::Visible(notification));

        *retirement = Some(tokio::spawn(retire(
            Arc::clone(&self.state),
            Arc::clone(&self.renderer),
            self.timing,
            id,
        )));
        id
    }

    /// Remove the current notification immediately, skipping the fade.
    pub fn dismiss(&self) {
        let mut retirement = self.retirement.lock().expect("retirement lock poisoned");
        if let Some(timer) = retirement.take() {
            timer.abort();
        }
        let previous = self.state.send_replace(NotificationState::Absent);
        if let Some(previous) = previous.notification() {
            debug!(id = %previous.id, "notification dismissed");
            self.renderer.remove(previous.id);
        }
    }

    pub fn state(&self) -> NotificationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.state.subscribe()
    }

    pub fn timing(&self) -> DisplayTiming {
        self.timing
    }
}

impl Drop for NotificationSurface {
    fn drop(&mut self) {
        if let Ok(mut retirement) = self.retirement.lock() {
            if let Some(timer) = retirement.take() {
                timer.abort();
            }
        }
    }
}

async fn retire(
    state: Arc<watch::Sender<NotificationState>>,
    renderer: Arc<dyn NotificationRenderer>,
    timing: DisplayTiming,
    id: NotificationId,
) {
    tokio::time::sleep(timing.dwell).await;
    let fading = state.send_if_modified(|current| {
        match std::mem::replace(current, NotificationState::Absent) {
            NotificationState::Visible(n) if n.id == id => {
                *current = NotificationState::Fading(n);
                true
            }
            other => {
                *current = other;
                false
            }
        }
    });
    if !fading {
        return;
    }
    debug!(id = %id, "notification fading");
    renderer.begin_fade(id);

    tokio::time::sleep(timing.fade).await;
    let removed = state.send_if_modified(|current| match current {
        NotificationState::Fading(n) if n.id == id => {
            *current = NotificationState::Absent;
            true
        }
        _ => false,
    });
    if removed {
        debug!(id = %id, "notification removed");
        renderer.remove(id);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
