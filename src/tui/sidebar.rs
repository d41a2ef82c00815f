/// Conversation sidebar — collapsible left panel with the user's history.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::AppState;

pub fn draw_sidebar(f: &mut Frame, state: &AppState, area: Rect) {
    let focused = state.sidebar_focused;
    let border_color = if focused { Color::Cyan } else { Color::Rgb(30, 41, 59) };

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Color::Rgb(6, 8, 15)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let w = inner.width as usize;
    let mut items: Vec<ListItem<'static>> = Vec::new();

    // Header
    let ctrl_hint = if focused { " Esc=salir" } else { " Tab=foco" };
    let header_pad = w.saturating_sub(15 + ctrl_hint.len());
    items.push(ListItem::new(Line::from(vec![
        Span::styled(
            " Historial Médico",
            Style::default().fg(Color::Rgb(100, 116, 150)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(header_pad), Style::default()),
        Span::styled(ctrl_hint.to_string(), Style::default().fg(Color::Rgb(50, 55, 75))),
    ])));

    // Filter line (incremental search while focused)
    if focused {
        let query = if state.sidebar_filter.is_empty() {
            Span::styled("buscar…", Style::default().fg(Color::Rgb(55, 60, 80)))
        } else {
            Span::styled(state.sidebar_filter.clone(), Style::default().fg(Color::White))
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(" ⌕ ", Style::default().fg(Color::Rgb(100, 116, 139))),
            query,
        ])));
    }
    items.push(ListItem::new(Line::from(vec![
        Span::styled("─".repeat(w), Style::default().fg(Color::Rgb(25, 30, 48))),
    ])));

    if state.list_loading {
        // Skeleton rows while the list request is in flight
        for _ in 0..3 {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(" ▒▒▒▒▒▒▒▒▒▒▒▒", Style::default().fg(Color::Rgb(30, 41, 59))),
            ])));
            items.push(ListItem::new(Line::raw("")));
        }
    } else if state.conversations.is_empty() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(" No hay conversaciones aún", Style::default().fg(Color::Rgb(70, 76, 96))),
        ])));
    } else {
        let filtered = state.filtered_conversations();
        if filtered.is_empty() {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(" sin coincidencias", Style::default().fg(Color::Rgb(55, 60, 80))),
            ])));
        }
        for (i, conv) in filtered.iter().enumerate() {
            let active = state.is_active(conv);
            let selected = focused && i == state.sidebar_selected;
            let confirming = state.delete_confirm.as_deref() == Some(conv.id.as_str());

            if confirming {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        " ¿Eliminar esta conversación?",
                        Style::default().fg(Color::Rgb(252, 165, 165)),
                    ),
                ])));
                items.push(ListItem::new(Line::from(vec![
                    Span::styled("   y", Style::default().fg(Color::Rgb(220, 38, 38)).add_modifier(Modifier::BOLD)),
                    Span::styled(" eliminar  ", Style::default().fg(Color::Rgb(120, 70, 70))),
                    Span::styled("n", Style::default().fg(Color::Rgb(148, 163, 184)).add_modifier(Modifier::BOLD)),
                    Span::styled(" cancelar", Style::default().fg(Color::Rgb(80, 85, 105))),
                ])));
                items.push(ListItem::new(Line::from(vec![
                    Span::styled("─".repeat(w), Style::default().fg(Color::Rgb(20, 25, 40))),
                ])));
                continue;
            }

            let (bg, bullet_fg, name_fg, meta_fg) = if active && selected {
                (Color::Rgb(20, 40, 50), Color::Cyan, Color::Cyan, Color::Rgb(0, 200, 200))
            } else if active {
                (Color::Rgb(12, 24, 32), Color::Cyan, Color::Cyan, Color::Rgb(0, 170, 170))
            } else if selected {
                (Color::Rgb(28, 32, 48), Color::Rgb(160, 170, 220), Color::White, Color::Rgb(140, 145, 200))
            } else {
                (Color::Reset, Color::Rgb(60, 66, 90), Color::Rgb(150, 155, 190), Color::Rgb(70, 76, 100))
            };

            let bullet = if active { "●" } else { "○" };

            // Line 1: bullet + title
            let title_max = w.saturating_sub(4);
            let title: String = conv.title.chars().take(title_max).collect();
            let gap = w.saturating_sub(3 + title.chars().count());
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!(" {bullet} "), Style::default().fg(bullet_fg).bg(bg)),
                Span::styled(
                    title,
                    Style::default().fg(name_fg).bg(bg).add_modifier(if active {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
                Span::styled(" ".repeat(gap), Style::default().bg(bg)),
            ])));

            // Line 2: started date (dimmer), when the backend sent one
            if let Some(date) = &conv.started_at {
                let date: String = date.chars().take(w.saturating_sub(3)).collect();
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("   {date}"), Style::default().fg(meta_fg).bg(bg)),
                ])));
            }

            items.push(ListItem::new(Line::from(vec![
                Span::styled("─".repeat(w), Style::default().fg(Color::Rgb(20, 25, 40))),
            ])));
        }
    }

    // Footer hint
    items.push(ListItem::new(Line::from(vec![
        Span::styled(
            " Ctrl+N nueva  d eliminar",
            Style::default().fg(Color::Rgb(55, 60, 80)),
        ),
    ])));

    f.render_widget(List::new(items), inner);
}
