//! Wiring shared by the scenarios: one relay, one page surface, one capture.
//!
//! The surface renders into an [`OverlayRenderer`] through a
//! [`RecordingRenderer`], so a scenario can both read the panel and replay
//! every lifecycle call the surface made.

use std::sync::{Arc, Mutex};

use claimcheck_capture::TriggerCapture;
use claimcheck_contracts::chord::KeyChord;
use claimcheck_core::{traits::VerificationService, Relay};
use claimcheck_notify::{
    notification::{Notification, NotificationId},
    render::{format_alert, NotificationRenderer, OverlayPanel, OverlayRenderer},
    surface::{DisplayTiming, NotificationSurface},
};

/// One lifecycle call received by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Show(NotificationId),
    BeginFade(NotificationId),
    Remove(NotificationId),
}

/// Forwards to an `OverlayRenderer` and keeps a log of every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    overlay: OverlayRenderer,
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn panel(&self) -> Option<OverlayPanel> {
        self.overlay.panel()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().expect("render log lock poisoned").clone()
    }

    /// Highest number of notifications that were ever on screen together.
    pub fn max_visible(&self) -> usize {
        let mut live = 0usize;
        let mut max = 0usize;
        for event in self.events() {
            match event {
                RenderEvent::Show(_) => {
                    live += 1;
                    max = max.max(live);
                }
                RenderEvent::Remove(_) => live = live.saturating_sub(1),
                RenderEvent::BeginFade(_) => {}
            }
        }
        max
    }

    fn record(&self, event: RenderEvent) {
        self.events.lock().expect("render log lock poisoned").push(event);
    }
}

impl NotificationRenderer for RecordingRenderer {
    fn show(&self, notification: &Notification) {
        self.record(RenderEvent::Show(notification.id));
        self.overlay.show(notification);
    }

    fn begin_fade(&self, id: NotificationId) {
        self.record(RenderEvent::BeginFade(id));
        self.overlay.begin_fade(id);
    }

    fn remove(&self, id: NotificationId) {
        self.record(RenderEvent::Remove(id));
        self.overlay.remove(id);
    }
}

pub struct Harness {
    pub capture: TriggerCapture,
    pub surface: Arc<NotificationSurface>,
    pub renderer: Arc<RecordingRenderer>,
}

impl Harness {
    /// Spawn a relay for `service` and attach a fresh page to it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(service: Arc<dyn VerificationService>, timing: DisplayTiming) -> Self {
        let relay = Relay::spawn(service, 8);
        let renderer = Arc::new(RecordingRenderer::default());
        let surface = Arc::new(NotificationSurface::new(renderer.clone(), timing));
        let capture = TriggerCapture::new(relay, &surface, KeyChord::default());
        Self {
            capture,
            surface,
            renderer,
        }
    }

    /// The notification currently on screen, if any.
    pub fn current(&self) -> Option<Notification> {
        self.surface.state().notification().cloned()
    }
}

/// Print a notification indented under a scenario heading.
pub fn print_notification(notification: &Notification) {
    for line in format_alert(notification, false).lines() {
        println!("    {line}");
    }
}
