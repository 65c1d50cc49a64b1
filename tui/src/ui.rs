//! Rendering.
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  claimcheck    hotkey Ctrl+Shift+V    checking… (1)                 │
//!   ├─── document ────────────────────────────────┬─── overlay panel ─────┤
//!   │  text with cursor and selection              │  Verdict / Summary    │
//!   │                                              │  Links                │
//!   ├──────────────────────────────────────────────┴───────────────────────┤
//!   │  manual entry                                                       │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! The overlay panel is drawn over the top-right corner of the document and
//! only while the surface has a notification.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use claimcheck_notify::{
    notification::{LinkView, NO_LINKS_PLACEHOLDER},
    render::OverlayPanel,
    tone::Tone,
};

use crate::app::{App, Mode};
use crate::document::Pos;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(6),    // document
            Constraint::Length(3), // manual entry
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_document(f, chunks[1], app);
    render_entry(f, chunks[2], app);
    render_footer(f, chunks[3], app);

    if let Some(panel) = app.overlay.panel() {
        render_overlay(f, overlay_area(chunks[1], &panel), &panel);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "claimcheck    ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("hotkey ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.hotkey_label(), Style::default().fg(Color::White)),
    ];
    if app.in_flight() > 0 {
        spans.push(Span::styled(
            format!("    checking… ({})", app.in_flight()),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_document(f: &mut Frame, area: Rect, app: &App) {
    let doc = &app.document;
    let cursor = doc.cursor();
    let browsing = app.mode == Mode::Browse;
    let selected = Style::default().bg(Color::Blue).fg(Color::White);
    let at_cursor = Style::default().add_modifier(Modifier::REVERSED);

    let lines: Vec<Line> = doc
        .lines()
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let mut spans: Vec<Span> = text
                .chars()
                .enumerate()
                .map(|(col, c)| {
                    let pos = Pos::new(row, col);
                    let style = if browsing && pos == cursor {
                        at_cursor
                    } else if doc.is_selected(pos) {
                        selected
                    } else {
                        Style::default()
                    };
                    Span::styled(c.to_string(), style)
                })
                .collect();
            if browsing && cursor.row == row && cursor.col == text.chars().count() {
                spans.push(Span::styled(" ", at_cursor));
            }
            Line::from(spans)
        })
        .collect();

    // Keep the cursor row on screen.
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = cursor.row.saturating_sub(inner_height.saturating_sub(1));

    let block = Block::default()
        .title(" Document ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if browsing {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn render_entry(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.mode == Mode::Entry;
    let line = if editing {
        Line::from(vec![
            Span::raw(app.entry.as_str()),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ])
    } else if app.entry.is_empty() {
        Line::from(Span::styled(
            "press i to type a claim",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.entry.as_str())
    };

    let block = Block::default()
        .title(" Manual entry ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Cyan);
    let spans = match app.mode {
        Mode::Browse => vec![
            Span::styled(" [Shift+arrows] ", key),
            Span::raw("Select  "),
            Span::styled("[a] ", key),
            Span::raw("Line  "),
            Span::styled("[v] ", key),
            Span::raw("Verify  "),
            Span::styled("[F5] ", key),
            Span::raw("Command  "),
            Span::styled("[i] ", key),
            Span::raw("Enter text  "),
            Span::styled("[d] ", key),
            Span::raw("Dismiss  "),
            Span::styled("[q] ", key),
            Span::raw("Quit"),
        ],
        Mode::Entry => vec![
            Span::styled(" [Enter] ", key),
            Span::raw("Verify  "),
            Span::styled("[Esc] ", key),
            Span::raw("Cancel"),
        ],
    };

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Overlay panel ─────────────────────────────────────────────────────────────

fn overlay_area(body: Rect, panel: &OverlayPanel) -> Rect {
    let width = body.width.saturating_sub(4).min(56);
    let links = panel.notification.links.len().max(1) as u16;
    // Borders, verdict, blank, summary (allow two wrapped lines), blank, "Links:", links.
    let height = (8 + links).min(body.height);
    Rect {
        x: body.x + body.width.saturating_sub(width + 1),
        y: body.y,
        width,
        height,
    }
}

fn link_line(link: &LinkView, dim: Modifier) -> Line<'_> {
    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED | dim);
    if link.is_bare_url() {
        Line::from(vec![Span::raw("  • "), Span::styled(link.url.as_str(), label)])
    } else {
        Line::from(vec![
            Span::raw("  • "),
            Span::styled(link.label.as_str(), label),
            Span::styled(
                format!(" {}", link.url),
                Style::default().fg(Color::DarkGray).add_modifier(dim),
            ),
        ])
    }
}

fn render_overlay(f: &mut Frame, area: Rect, panel: &OverlayPanel) {
    let notification = &panel.notification;
    let dim = if panel.fading {
        Modifier::DIM
    } else {
        Modifier::empty()
    };
    let accent = match notification.tone {
        Tone::Affirmative => Color::Green,
        Tone::Alert => Color::Red,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Verdict: ", Style::default().fg(Color::Gray).add_modifier(dim)),
            Span::styled(
                notification.verdict.as_str(),
                Style::default()
                    .fg(accent)
                    .add_modifier(Modifier::BOLD | dim),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            notification.summary.as_str(),
            Style::default().add_modifier(dim),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Links:",
            Style::default().fg(Color::Gray).add_modifier(dim),
        )),
    ];
    if notification.has_links() {
        lines.extend(notification.links.iter().map(|link| link_line(link, dim)));
    } else {
        lines.push(Line::from(Span::styled(
            format!("  {NO_LINKS_PLACEHOLDER}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC | dim),
        )));
    }

    let block = Block::default()
        .title(" Fact check ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if panel.fading {
            Color::DarkGray
        } else {
            accent
        }));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
