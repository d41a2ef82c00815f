/// Transcript pane rendering — build_items, draw_history, spinner, wrap.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem},
};
use unicode_width::UnicodeWidthStr;

use super::{AppState, FREQUENT_QUESTIONS};
use crate::controller::Delivery;
use crate::decode::Role;
use crate::format::{self, Block as ReplyBlock, SectionLine};
use crate::ui::accent_color;

// ── Spinner ───────────────────────────────────────────────────────────────────

pub const SPINNER_GLYPHS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_MSGS: &[(&str, Color)] = &[
    ("Analizando síntomas…",        Color::Cyan),
    ("Consultando…",                Color::Cyan),
    ("Revisando tu historial…",     Color::Rgb(0, 200, 255)),
    ("Preparando la respuesta…",    Color::Rgb(0, 220, 180)),
    ("Un momento…",                 Color::Rgb(100, 200, 255)),
];

pub fn spinner_frame(tick: u32) -> (&'static str, &'static str, Color) {
    let glyph = SPINNER_GLYPHS[(tick as usize) % SPINNER_GLYPHS.len()];
    // Message cycles more slowly — changes every ~2 seconds (120ms × 16 ticks)
    let msg_idx = (tick as usize / 16) % SPINNER_MSGS.len();
    let (msg, color) = SPINNER_MSGS[msg_idx];
    (glyph, msg, color)
}

// ── History items builder ──────────────────────────────────────────────────────

pub fn build_items(state: &AppState, term_width: u16) -> Vec<ListItem<'static>> {
    let mut items: Vec<ListItem<'static>> = Vec::new();

    if state.transcript.is_empty() && !state.sending {
        push_empty_state(&mut items, state);
    }

    let last_assistant = state.last_assistant_index();

    for (i, entry) in state.transcript.iter().enumerate() {
        match entry.message.role {
            Role::User => push_user_bubble(
                &mut items,
                &entry.message.content,
                entry.delivery,
                term_width,
            ),
            Role::Assistant => {
                push_assistant_blocks(&mut items, &entry.message.content, entry.delivery, term_width);
                if last_assistant == Some(i) && entry.delivery != Delivery::Failed {
                    push_feedback_line(&mut items, state, i);
                }
                items.push(ListItem::new(Line::raw("")));
            }
        }
    }

    if state.sending {
        let (glyph, msg, color) = spinner_frame(state.spinner_tick);
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{glyph} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(msg.to_string(), Style::default().fg(color)),
        ])));
    }

    items
}

// ── Empty state (greeting + suggested openers) ────────────────────────────────

fn push_empty_state(items: &mut Vec<ListItem<'static>>, state: &AppState) {
    let nombre = state
        .user
        .as_ref()
        .map(|u| u.nombre.as_str())
        .unwrap_or("Usuario");

    items.push(ListItem::new(Line::raw("")));
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled("⚕ ", Style::default().fg(Color::Rgb(14, 165, 233))),
        Span::styled(
            format!("Hola, {nombre}"),
            Style::default().fg(Color::Rgb(16, 185, 129)).add_modifier(Modifier::BOLD),
        ),
    ])));
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            "¿Cómo puedo ayudarte con tu salud hoy? Describe tus síntomas o hazme cualquier pregunta médica.",
            Style::default().fg(Color::Rgb(100, 116, 139)),
        ),
    ])));
    items.push(ListItem::new(Line::raw("")));
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            "Preguntas frecuentes",
            Style::default().fg(Color::Rgb(70, 70, 90)).add_modifier(Modifier::BOLD),
        ),
    ])));
    for (i, q) in FREQUENT_QUESTIONS.iter().enumerate() {
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("Alt+{} ", i + 1), Style::default().fg(Color::Rgb(200, 160, 30))),
            Span::styled((*q).to_string(), Style::default().fg(Color::Rgb(120, 130, 150))),
        ])));
    }
    items.push(ListItem::new(Line::raw("")));
}

// ── User bubble ───────────────────────────────────────────────────────────────

fn push_user_bubble(
    items: &mut Vec<ListItem<'static>>,
    msg: &str,
    delivery: Delivery,
    term_width: u16,
) {
    // Bubble colours — failed sends get a red edge, pending a dim one
    let bg = Color::Rgb(26, 30, 46);
    let border = match delivery {
        Delivery::Failed => Color::Rgb(200, 70, 70),
        Delivery::Pending => Color::Rgb(60, 70, 100),
        Delivery::Confirmed => Color::Rgb(14, 120, 170),
    };
    let label_fg = Color::Rgb(120, 190, 230);
    let text_fg = Color::Rgb(232, 238, 255);
    let body_style = Style::default().fg(text_fg).bg(bg);
    let edge_style = Style::default().fg(border).bg(bg);

    let label = match delivery {
        Delivery::Pending => "tú ⋯",
        Delivery::Failed => "tú ✗",
        Delivery::Confirmed => "tú",
    };

    // Dynamic widths — 2 chars left margin, 1 right margin
    let inner_w = (term_width as usize).saturating_sub(3).max(10);
    let dash_total = inner_w.saturating_sub(4 + label.width() + 1);
    let top_dashes = "─".repeat(dash_total);
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled("╭─ ".to_string(), edge_style),
        Span::styled(
            label.to_string(),
            Style::default().fg(label_fg).bg(bg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {top_dashes}╮"), edge_style),
    ])));

    // Body — word-wrap inside the box (inner_w minus "│ " = 2)
    let wrap_width = inner_w.saturating_sub(2).max(10);
    let raw_lines: Vec<&str> = if msg.is_empty() { vec![""] } else { msg.lines().collect() };
    let wrapped: Vec<String> = raw_lines
        .iter()
        .flat_map(|line| wrap_text(line, wrap_width))
        .collect();
    for line in &wrapped {
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled("│ ".to_string(), edge_style),
            Span::styled(line.clone(), body_style),
        ])));
    }

    let bot_dashes = "─".repeat(inner_w.saturating_sub(2));
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("╰{bot_dashes}╯"), edge_style),
    ])));
    items.push(ListItem::new(Line::raw("")));
}

// ── Assistant reply — formatter blocks ────────────────────────────────────────

fn push_assistant_blocks(
    items: &mut Vec<ListItem<'static>>,
    content: &str,
    delivery: Delivery,
    term_width: u16,
) {
    if delivery == Delivery::Failed {
        // In-transcript error message from a failed send
        let wrap_width = (term_width as usize).saturating_sub(6).max(20);
        for line in wrap_text(content, wrap_width) {
            items.push(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled("✗ ", Style::default().fg(Color::Rgb(220, 80, 80))),
                Span::styled(line, Style::default().fg(Color::Rgb(220, 120, 120))),
            ])));
        }
        return;
    }

    let wrap_width = (term_width as usize).saturating_sub(8).max(20);
    for block in format::format_reply(content) {
        match block {
            ReplyBlock::Section(section) => {
                let color = accent_color(section.color);
                items.push(ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{} ", section.icon), Style::default()),
                    Span::styled(
                        section.title.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])));
                for line in &section.lines {
                    match line {
                        SectionLine::Bullet(text) => {
                            let mut first = true;
                            for w in wrap_text(text, wrap_width.saturating_sub(2)) {
                                if first {
                                    first = false;
                                    items.push(ListItem::new(Line::from(vec![
                                        Span::raw("     "),
                                        Span::styled("• ".to_string(), Style::default().fg(color)),
                                        Span::styled(w, Style::default().fg(Color::Rgb(203, 213, 225))),
                                    ])));
                                } else {
                                    items.push(ListItem::new(Line::from(vec![
                                        Span::raw("       "),
                                        Span::styled(w, Style::default().fg(Color::Rgb(203, 213, 225))),
                                    ])));
                                }
                            }
                        }
                        SectionLine::Text(text) => {
                            for w in wrap_text(text, wrap_width) {
                                items.push(ListItem::new(Line::from(vec![
                                    Span::raw("     "),
                                    Span::styled(w, Style::default().fg(Color::Rgb(203, 213, 225))),
                                ])));
                            }
                        }
                    }
                }
                items.push(ListItem::new(Line::raw("")));
            }
            ReplyBlock::Divider => {
                let dashes = "─".repeat((term_width as usize).saturating_sub(8).max(10));
                items.push(ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(dashes, Style::default().fg(Color::Rgb(30, 41, 59))),
                ])));
            }
            ReplyBlock::Paragraph(text) => {
                let bar_color = accent_color(format::DEFAULT_COLOR);
                for w in wrap_text(&text, wrap_width) {
                    items.push(ListItem::new(Line::from(vec![
                        Span::raw("  "),
                        Span::styled("▌ ".to_string(), Style::default().fg(bar_color)),
                        Span::styled(w, Style::default().fg(Color::Rgb(203, 213, 225))),
                    ])));
                }
            }
        }
    }
}

// ── Feedback line under the newest assistant reply ────────────────────────────

fn push_feedback_line(items: &mut Vec<ListItem<'static>>, state: &AppState, index: usize) {
    match state.feedback_given.get(&index) {
        Some(positive) => {
            let (mark, color) = if *positive {
                ("👍", Color::Rgb(16, 185, 129))
            } else {
                ("👎", Color::Rgb(239, 68, 68))
            };
            let mut spans = vec![
                Span::raw("  "),
                Span::styled(mark.to_string(), Style::default().fg(color)),
            ];
            if state.thanks_ticks > 0 {
                spans.push(Span::styled(
                    "  ¡Gracias por tu retroalimentación!",
                    Style::default().fg(Color::Rgb(16, 185, 129)),
                ));
            }
            items.push(ListItem::new(Line::from(spans)));
        }
        None => {
            items.push(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    "Alt+↑ útil · Alt+↓ no útil",
                    Style::default().fg(Color::Rgb(55, 60, 80)),
                ),
            ])));
        }
    }
}

// ── Draw ──────────────────────────────────────────────────────────────────────

pub fn draw_history(f: &mut Frame, state: &AppState, area: Rect) {
    let all_items = build_items(state, area.width);
    let total = all_items.len();
    let visible = area.height as usize;

    let skip = if total > visible {
        (total - visible).saturating_sub(state.scroll)
    } else {
        0
    };

    let sliced: Vec<ListItem<'static>> = all_items.into_iter().skip(skip).collect();
    let list = List::new(sliced)
        .block(Block::default().style(Style::default().bg(Color::Rgb(8, 10, 18))));
    f.render_widget(list, area);
}

// ── Utilities ──────────────────────────────────────────────────────────────────

/// Word-wrap a single line of text to `max_width` columns (display width,
/// not bytes). Splits on whitespace; a word longer than the line keeps its
/// own line rather than being cut.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width == 0 {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(current.clone());
            current = word.to_string();
            current_width = word_width;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_display_width() {
        let lines = wrap_text("uno dos tres cuatro", 8);
        assert_eq!(lines, vec!["uno dos", "tres", "cuatro"]);
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let lines = wrap_text("supercalifragilístico ya", 10);
        assert_eq!(lines[0], "supercalifragilístico");
        assert_eq!(lines[1], "ya");
    }

    #[test]
    fn wrap_empty_is_single_blank() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
