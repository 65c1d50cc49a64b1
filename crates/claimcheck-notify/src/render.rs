//! Rendering strategies.
//!
//! A surface picks one strategy from what its host can do:
//!
//! - `BlockingAlert` — synchronous plain-text block, for hosts without a
//!   styling surface (the CLI).
//! - `OverlayPanel`  — non-blocking styled panel drawn by the host on its own
//!   frame loop (the TUI).
//!
//! Both show verdict, summary, and links, with the same placeholder when
//! there are no links.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::Mutex;

use tracing::warn;

use crate::notification::{Notification, NotificationId, NO_LINKS_PLACEHOLDER};

/// Receives lifecycle transitions from a `NotificationSurface`.
///
/// `show` is called when a notification becomes visible, `begin_fade` when
/// the dwell time is over, and `remove` when it must disappear, either at the
/// end of the fade or because a newer notification replaced it.
pub trait NotificationRenderer: Send + Sync {
    fn show(&self, notification: &Notification);

    fn begin_fade(&self, _id: NotificationId) {}

    fn remove(&self, _id: NotificationId) {}
}

/// What the hosting surface can display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    /// The host can draw a styled, non-blocking panel.
    pub styled_overlay: bool,
    /// The host's terminal understands OSC 8 hyperlinks.
    pub hyperlinks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    BlockingAlert,
    OverlayPanel,
}

impl RenderStrategy {
    pub fn for_surface(capabilities: SurfaceCapabilities) -> Self {
        if capabilities.styled_overlay {
            Self::OverlayPanel
        } else {
            Self::BlockingAlert
        }
    }
}

// ── Blocking alert ────────────────────────────────────────────────────────────

/// Format a notification as a plain-text alert block.
pub fn format_alert(notification: &Notification, hyperlinks: bool) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "── Fact check ──────────────────────────────");
    let _ = writeln!(text, "Verdict: {}", notification.verdict);
    let _ = writeln!(text, "Summary: {}", notification.summary);
    let _ = writeln!(text, "Links:");
    if notification.links.is_empty() {
        let _ = writeln!(text, "  {NO_LINKS_PLACEHOLDER}");
    }
    for link in &notification.links {
        if hyperlinks {
            let _ = writeln!(text, "  • {}", link.hyperlink());
        } else if link.is_bare_url() {
            let _ = writeln!(text, "  • {}", link.url);
        } else {
            let _ = writeln!(text, "  • {} <{}>", link.label, link.url);
        }
    }
    let _ = writeln!(text, "────────────────────────────────────────────");
    text
}

/// Writes each notification synchronously to `W` as soon as it is shown.
///
/// The write happens on the caller's thread; there is nothing to fade or
/// remove afterwards.
pub struct AlertRenderer<W> {
    out: Mutex<W>,
    hyperlinks: bool,
}

impl<W: Write + Send> AlertRenderer<W> {
    pub fn new(out: W, hyperlinks: bool) -> Self {
        Self {
            out: Mutex::new(out),
            hyperlinks,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> NotificationRenderer for AlertRenderer<W> {
    fn show(&self, notification: &Notification) {
        let text = format_alert(notification, self.hyperlinks);
        let mut out = self.out.lock().expect("alert writer lock poisoned");
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(id = %notification.id, error = %e, "failed to write alert");
        }
    }
}

// ── Overlay panel ─────────────────────────────────────────────────────────────

/// The panel a host should currently draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPanel {
    pub notification: Notification,
    /// Drawn dimmed while the dismissal is in progress.
    pub fading: bool,
}

/// Keeps the current overlay panel for a host that redraws on its own loop.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    panel: Mutex<Option<OverlayPanel>>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the panel to draw, if any.
    pub fn panel(&self) -> Option<OverlayPanel> {
        self.panel.lock().expect("overlay panel lock poisoned").clone()
    }
}

impl NotificationRenderer for OverlayRenderer {
    fn show(&self, notification: &Notification) {
        *self.panel.lock().expect("overlay panel lock poisoned") = Some(OverlayPanel {
            notification: notification.clone(),
            fading: false,
        });
    }

    fn begin_fade(&self, id: NotificationId) {
        let mut panel = self.panel.lock().expect("overlay panel lock poisoned");
        if let Some(current) = panel.as_mut().filter(|p| p.notification.id == id) {
            current.fading = true;
        }
    }

    fn remove(&self, id: NotificationId) {
        let mut panel = self.panel.lock().expect("overlay panel lock poisoned");
        if panel.as_ref().is_some_and(|p| p.notification.id == id) {
            *panel = None;
        }
    }
}
