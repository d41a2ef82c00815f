/// Ratatui draw entry-point.
/// Thin dispatcher — transcript rendering lives in chat.rs, the list in
/// sidebar.rs, the login form in auth.rs.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::chat::{SPINNER_GLYPHS, wrap_text};
use super::{AppState, Mode};

// ── Main draw entry point ─────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, state: &AppState) {
    if state.mode == Mode::Auth {
        super::auth::draw_auth(f, state);
        if state.alert.is_some() {
            draw_alert(f, state, f.area());
        }
        return;
    }

    let area = f.area();

    // Horizontal split when sidebar is visible
    let main_area = if state.sidebar_visible {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);
        super::sidebar::draw_sidebar(f, state, cols[0]);
        cols[1]
    } else {
        area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header bar
            Constraint::Min(0),    // transcript
            Constraint::Length(1), // status bar
            Constraint::Length(3), // input box
        ])
        .split(main_area);

    draw_header(f, state, chunks[0]);
    super::chat::draw_history(f, state, chunks[1]);
    draw_status_bar(f, state, chunks[2]);
    draw_input(f, state, chunks[3]);

    if state.alert.is_some() {
        draw_alert(f, state, area);
    }
}

// ── Header bar ────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, state: &AppState, area: Rect) {
    let title = state
        .selected
        .as_ref()
        .map(|c| c.title.clone())
        .unwrap_or_else(|| "Nueva consulta".to_string());

    let user = state
        .user
        .as_ref()
        .map(|u| format!("{} · {}", u.nombre, u.correo))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled("⚕", Style::default().fg(Color::Rgb(14, 165, 233)).add_modifier(Modifier::BOLD)),
        Span::styled(" MediAssist", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(title, Style::default().fg(Color::Rgb(100, 180, 220))),
        Span::styled("   ", Style::default()),
        Span::styled(user, Style::default().fg(Color::Rgb(70, 76, 100))),
    ]);

    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::Rgb(6, 8, 15))),
        area,
    );
}

// ── Status bar ────────────────────────────────────────────────────────────────

fn draw_status_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let (status_glyph, status_color) = if state.sending {
        let g = SPINNER_GLYPHS[(state.spinner_tick as usize) % SPINNER_GLYPHS.len()];
        (g, Color::Cyan)
    } else {
        ("⚕", Color::White)
    };

    let recording = if state.recording {
        // blink at ~1Hz
        if (state.spinner_tick / 4) % 2 == 0 { "  ● grabando" } else { "  ○ grabando" }
    } else {
        ""
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(status_glyph, Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {}", state.profile_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::Rgb(70, 76, 100))),
        Span::styled(
            recording.to_string(),
            Style::default().fg(Color::Rgb(239, 68, 68)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Ctrl+B historial  Ctrl+N nueva  Ctrl+R voz  Ctrl+L salir",
            Style::default().fg(Color::Rgb(50, 55, 80)),
        ),
    ]);

    let bar_style = if state.sending {
        Style::default().bg(Color::Rgb(13, 17, 28))
    } else {
        Style::default().bg(Color::Rgb(10, 13, 22))
    };

    f.render_widget(Paragraph::new(line).style(bar_style), area);
}

// ── Input box ─────────────────────────────────────────────────────────────────

fn draw_input(f: &mut Frame, state: &AppState, area: Rect) {
    let (border_color, prompt_color, prompt_char) = if state.sending {
        (Color::Rgb(40, 44, 60), Color::DarkGray, "·")
    } else if state.recording {
        (Color::Rgb(239, 68, 68), Color::Rgb(239, 68, 68), "●")
    } else if state.sidebar_focused {
        (Color::Rgb(40, 44, 60), Color::DarkGray, "❯")
    } else {
        (Color::Rgb(60, 64, 84), Color::Cyan, "❯")
    };

    let prompt_span = Span::styled(
        format!("  {prompt_char} "),
        Style::default().fg(prompt_color).add_modifier(Modifier::BOLD),
    );

    let content_span = if state.input.is_empty() {
        if state.recording {
            Span::styled("escuchando…", Style::default().fg(Color::Rgb(180, 100, 100)))
        } else {
            Span::styled(
                "Describe tus síntomas…  ·  Enter enviar",
                Style::default().fg(Color::Rgb(70, 74, 92)),
            )
        }
    } else {
        Span::styled(state.input.clone(), Style::default().fg(Color::White))
    };

    let input_line = Line::from(vec![prompt_span, content_span]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Color::Rgb(8, 10, 18)));

    let paragraph = Paragraph::new(input_line)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);

    // Position cursor at the actual edit cursor, not end of string
    if !state.sending && !state.sidebar_focused {
        // prompt is "  ❯ " — 4 visible columns
        let prompt_width: u16 = 4;
        let text_before_cursor = &state.input[..state.cursor.min(state.input.len())];
        let cursor_x = area.x + prompt_width + text_before_cursor.width() as u16;
        let cursor_y = area.y + 1; // +1 for top border
        if cursor_x < area.x + area.width {
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

// ── Alert overlay ─────────────────────────────────────────────────────────────

/// Blocking notice — alert()-equivalent. Any key dismisses it.
fn draw_alert(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(msg) = &state.alert else { return };

    let width = 52.min(area.width.saturating_sub(4)).max(20);
    let wrapped = wrap_text(msg, width.saturating_sub(4) as usize);
    let height = (wrapped.len() as u16 + 4).min(area.height);
    let rect = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(220, 80, 80)))
        .title(Span::styled(
            " Aviso ",
            Style::default().fg(Color::Rgb(252, 165, 165)).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(Color::Rgb(20, 12, 14)));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines: Vec<Line> = wrapped
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Rgb(230, 220, 220)))))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "pulsa cualquier tecla",
        Style::default().fg(Color::Rgb(120, 90, 90)),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}
