//! Application state and key handling.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use claimcheck_capture::{Dispatch, TriggerCapture};
use claimcheck_contracts::message::TriggerCommand;
use claimcheck_notify::{render::OverlayRenderer, surface::NotificationSurface};

use crate::document::{Document, Motion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving around and selecting text in the document.
    Browse,
    /// Typing into the manual entry box.
    Entry,
}

pub struct App {
    pub document: Document,
    pub mode: Mode,
    pub entry: String,
    pub overlay: Arc<OverlayRenderer>,
    pub surface: Arc<NotificationSurface>,
    capture: TriggerCapture,
    in_flight: Vec<Dispatch>,
    /// The terminal sends Ctrl+Shift+letter as Ctrl+letter.
    legacy_keyboard: bool,
    pub quit: bool,
}

impl App {
    pub fn new(
        document: Document,
        capture: TriggerCapture,
        surface: Arc<NotificationSurface>,
        overlay: Arc<OverlayRenderer>,
    ) -> Self {
        Self {
            document,
            mode: Mode::Browse,
            entry: String::new(),
            overlay,
            surface,
            capture,
            in_flight: Vec::new(),
            legacy_keyboard: false,
            quit: false,
        }
    }

    pub fn legacy_keyboard(mut self, legacy: bool) -> Self {
        self.legacy_keyboard = legacy;
        self
    }

    pub fn hotkey_label(&self) -> String {
        self.capture.hotkey().to_string()
    }

    /// Forget exchanges that have finished.
    pub fn reap(&mut self) {
        self.in_flight.retain(|dispatch| !dispatch.is_finished());
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn track(&mut self, dispatch: Dispatch) {
        if !dispatch.is_rejected() {
            self.in_flight.push(dispatch);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Entry => self.handle_entry_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if let KeyCode::Char(c) = key.code {
            // Legacy terminals never report Shift with Ctrl on a letter, so
            // take the hotkey's own Shift setting instead.
            let shift = if self.legacy_keyboard && ctrl && c.is_ascii_alphabetic() {
                self.capture.hotkey().shift
            } else {
                shift
            };
            if let Some(dispatch) = self.capture.on_key(ctrl, alt, shift, c, &self.document) {
                self.track(dispatch);
                return;
            }
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,

            // The on-page "verify selection" control.
            KeyCode::Char('v') if !ctrl && !alt => {
                let dispatch = self.capture.on_control(&self.document);
                self.track(dispatch);
            }
            // Command palette entry.
            KeyCode::F(5) => {
                let dispatch = self
                    .capture
                    .on_command(TriggerCommand::VerifySelectedText, &self.document);
                self.track(dispatch);
            }

            KeyCode::Char('i') => self.mode = Mode::Entry,
            KeyCode::Char('a') => self.document.select_line(),
            KeyCode::Char('d') => self.surface.dismiss(),
            KeyCode::Esc => self.document.clear_selection(),

            KeyCode::Left => self.document.move_cursor(Motion::Left, shift),
            KeyCode::Right => self.document.move_cursor(Motion::Right, shift),
            KeyCode::Up => self.document.move_cursor(Motion::Up, shift),
            KeyCode::Down => self.document.move_cursor(Motion::Down, shift),
            KeyCode::Home => self.document.move_cursor(Motion::LineStart, shift),
            KeyCode::End => self.document.move_cursor(Motion::LineEnd, shift),
            _ => {}
        }
    }

    /// Bracketed paste. Goes into the entry box and is ignored while browsing,
    /// so pasted text is never read as key commands.
    pub fn handle_paste(&mut self, text: &str) {
        if self.mode == Mode::Entry {
            let flattened = text.chars().map(|c| if c.is_control() { ' ' } else { c });
            self.entry.extend(flattened);
        }
    }

    fn handle_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.entry);
                let dispatch = self.capture.submit(&text);
                self.track(dispatch);
                self.mode = Mode::Browse;
            }
            KeyCode::Esc => {
                self.entry.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.entry.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char(c) => self.entry.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use claimcheck_contracts::{
        chord::KeyChord,
        error::ClaimcheckResult,
        outcome::{ReferenceLink, VerificationReport},
        request::VerificationRequest,
    };
    use claimcheck_core::{traits::VerificationService, Relay};
    use claimcheck_notify::{surface::DisplayTiming, tone::Tone};

    use super::*;

    struct EchoService;

    #[async_trait]
    impl VerificationService for EchoService {
        async fn verify(
            &self,
            request: &VerificationRequest,
        ) -> ClaimcheckResult<VerificationReport> {
            Ok(VerificationReport {
                id: None,
                verdict: "False".to_string(),
                summary: format!("checked: {}", request.text()),
                links: vec![ReferenceLink::new("NASA", "https://nasa.gov")],
                extra: Default::default(),
            })
        }
    }

    fn app(page: &str) -> App {
        let relay = Relay::spawn(Arc::new(EchoService), 4);
        let overlay = Arc::new(OverlayRenderer::new());
        let surface = Arc::new(NotificationSurface::new(
            overlay.clone(),
            DisplayTiming::default(),
        ));
        let capture = TriggerCapture::new(relay, &surface, KeyChord::default());
        App::new(Document::new(page), capture, surface, overlay)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    async fn settle(app: &mut App) {
        for dispatch in std::mem::take(&mut app.in_flight) {
            dispatch.settled().await;
        }
    }

    #[tokio::test]
    async fn hotkey_verifies_the_selected_line() {
        let mut app = app("The Earth is flat\nsecond line");
        app.handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_key(key(
            KeyCode::Char('V'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(app.in_flight(), 1);
        settle(&mut app).await;

        let panel = app.overlay.panel().expect("panel should be drawn");
        assert_eq!(panel.notification.verdict, "False");
        assert_eq!(panel.notification.tone, Tone::Alert);
        assert_eq!(panel.notification.summary, "checked: The Earth is flat");
        assert!(!panel.fading);
    }

    #[tokio::test]
    async fn control_without_selection_shows_notice() {
        let mut app = app("The Earth is flat");
        app.handle_key(key(KeyCode::Char('v'), KeyModifiers::NONE));
        assert_eq!(app.in_flight(), 0);
        let panel = app.overlay.panel().unwrap();
        assert_eq!(panel.notification.verdict, "Nothing to verify");
    }

    #[tokio::test]
    async fn manual_entry_submits_on_enter() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Char('i'), KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Entry);
        for c in "Cats glow".chars() {
            app.handle_key(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(key(KeyCode::Backspace, KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Browse);
        assert!(app.entry.is_empty());
        settle(&mut app).await;

        let panel = app.overlay.panel().unwrap();
        assert_eq!(panel.notification.summary, "checked: Cats glo");
    }

    #[tokio::test]
    async fn command_key_and_dismiss() {
        let mut app = app("The Earth is flat");
        app.handle_key(key(KeyCode::End, KeyModifiers::SHIFT));
        app.handle_key(key(KeyCode::F(5), KeyModifiers::NONE));
        settle(&mut app).await;
        assert!(app.overlay.panel().is_some());

        app.handle_key(key(KeyCode::Char('d'), KeyModifiers::NONE));
        assert!(app.overlay.panel().is_none());
        assert!(app.surface.state().is_absent());
    }

    #[tokio::test]
    async fn q_quits_only_outside_entry() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Char('i'), KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.quit);
        assert_eq!(app.entry, "q");
        app.handle_key(key(KeyCode::Esc, KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.quit);
    }

    // ── Terminal key encodings ───────────────────────────────────────────────

    #[tokio::test]
    async fn legacy_ctrl_v_triggers_the_ctrl_shift_hotkey() {
        let mut app = app("The Earth is flat").legacy_keyboard(true);
        app.handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE));
        // What crossterm reports for Ctrl+Shift+V without keyboard enhancement.
        app.handle_key(key(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert_eq!(app.in_flight(), 1);
        settle(&mut app).await;

        let panel = app.overlay.panel().expect("panel should be drawn");
        assert_eq!(panel.notification.summary, "checked: The Earth is flat");
    }

    #[tokio::test]
    async fn ctrl_v_is_not_the_hotkey_when_shift_is_reported() {
        let mut app = app("The Earth is flat");
        app.handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert_eq!(app.in_flight(), 0);
        assert!(app.overlay.panel().is_none());
        assert!(app.surface.state().is_absent());
    }

    #[tokio::test]
    async fn paste_while_browsing_is_not_read_as_commands() {
        let mut app = app("The Earth is flat");
        app.handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_paste("quiv");
        assert!(!app.quit);
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.in_flight(), 0);
        assert!(app.overlay.panel().is_none());
    }

    #[tokio::test]
    async fn paste_in_entry_appends_to_the_claim() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Char('i'), KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Char('>'), KeyModifiers::NONE));
        app.handle_paste("Water boils\nat 100C");
        assert_eq!(app.entry, ">Water boils at 100C");
        assert!(!app.quit);
    }
}
