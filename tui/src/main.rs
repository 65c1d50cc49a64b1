//! claimcheck — interactive Ratatui host
//!
//! Shows a document, lets the user select text with the keyboard, and sends
//! the selection for verification by hotkey, by the `v` control, by the F5
//! command, or by typing a claim into the manual entry box. Results appear in
//! an overlay panel that fades out on its own.
//!
//! Usage:
//!   cargo run -p claimcheck-tui
//!   cargo run -p claimcheck-tui -- article.txt --endpoint http://127.0.0.1:9000/verify

mod app;
mod document;
mod ui;

use std::{fs, io, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use claimcheck_capture::TriggerCapture;
use claimcheck_client::http::HttpVerificationClient;
use claimcheck_contracts::{
    config::ClaimcheckConfig,
    error::{ClaimcheckError, ClaimcheckResult},
};
use claimcheck_core::Relay;
use claimcheck_notify::{
    render::OverlayRenderer,
    surface::NotificationSurface,
};

use crate::app::App;
use crate::document::Document;

const SAMPLE_PAGE: &str = "\
Daily Digest

The Earth is flat, according to a post that went viral this week.
Water boils at 100 degrees Celsius at sea level.
The Great Wall of China is visible from the Moon with the naked eye.
Humans only use ten percent of their brains.

Select a sentence with Shift+arrows (or press a for the whole line),
then press the hotkey, v, or F5. Press i to type a claim instead.
";

/// Redraw interval; also how quickly a fade or removal shows up on screen.
const FRAME: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(
    name = "claimcheck-tui",
    version,
    about = "Select text in a document and fact-check it"
)]
struct Cli {
    /// Text file to display. A sample page is shown when omitted.
    file: Option<PathBuf>,

    /// TOML configuration file. Every key is optional.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `[service] endpoint` from the configuration.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

fn load(cli: &Cli) -> ClaimcheckResult<(ClaimcheckConfig, String)> {
    let mut config = ClaimcheckConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = endpoint.clone();
        config.validate()?;
    }
    let page = match &cli.file {
        Some(path) => fs::read_to_string(path).map_err(|e| ClaimcheckError::Config {
            reason: format!("failed to read '{}': {e}", path.display()),
        })?,
        None => SAMPLE_PAGE.to_string(),
    };
    Ok((config, page))
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

/// Returns the terminal and whether it reports Shift on Ctrl+letter keys.
///
/// Without the keyboard enhancement protocol a terminal sends Ctrl+Shift+V
/// as plain Ctrl+V.
fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<io::Stdout>>, bool)> {
    enable_raw_mode()?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    Ok((Terminal::new(backend)?, enhanced))
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    enhanced: bool,
) -> io::Result<()> {
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let (config, page) = match load(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("claimcheck-tui: {e}");
            std::process::exit(1);
        }
    };

    // Relay, capture, and the surface timers run on the runtime's workers;
    // the UI loop below stays on this thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let client = match HttpVerificationClient::new(&config.service) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("claimcheck-tui: {e}");
            std::process::exit(1);
        }
    };
    let relay = Relay::spawn(Arc::new(client), config.relay.queue_capacity);

    let overlay = Arc::new(OverlayRenderer::new());
    let surface = Arc::new(NotificationSurface::new(
        overlay.clone(),
        config.notification.clone().into(),
    ));
    let capture = TriggerCapture::new(relay, &surface, config.capture.hotkey);
    let (mut terminal, enhanced) = setup_terminal()?;
    let mut app =
        App::new(Document::new(&page), capture, surface, overlay).legacy_keyboard(!enhanced);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        default_hook(info);
    }));

    while !app.quit {
        app.reap();
        terminal.draw(|f| ui::ui(f, &app))?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }
    }

    restore_terminal(&mut terminal, enhanced)?;
    Ok(())
}
