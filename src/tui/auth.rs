/// Auth screen — centered login/register form, shown until a profile exists.
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{AppState, AuthField, AuthView};

pub fn draw_auth(f: &mut Frame, state: &AppState) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(8, 10, 18))),
        area,
    );

    let form = &state.auth;
    let is_register = form.view == AuthView::Register;

    // 3 lines per field + title block + error/hint rows
    let field_rows: u16 = if is_register { 9 } else { 6 };
    let height = (8 + field_rows).min(area.height);
    let width = 56.min(area.width);
    let rect = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(14, 165, 233)))
        .style(Style::default().bg(Color::Rgb(10, 14, 24)));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("⚕ ", Style::default().fg(Color::Rgb(14, 165, 233))),
        Span::styled(
            if is_register { "Crear cuenta" } else { "Bienvenido" },
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ])
    .alignment(Alignment::Center));
    lines.push(
        Line::from(Span::styled(
            if is_register { "Regístrate para comenzar" } else { "Accede a tu asistente médico" },
            Style::default().fg(Color::Rgb(100, 116, 139)),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(Line::raw(""));

    if is_register {
        push_field(&mut lines, "Nombre completo", &form.nombre, false, form.focus == AuthField::Nombre);
    }
    push_field(&mut lines, "Correo electrónico", &form.correo, false, form.focus == AuthField::Correo);
    push_field(&mut lines, "Contraseña", &form.password, true, form.focus == AuthField::Password);

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Rgb(220, 80, 80)),
        )));
    } else {
        lines.push(Line::raw(""));
    }

    if form.loading {
        lines.push(
            Line::from(Span::styled("Cargando…", Style::default().fg(Color::Rgb(148, 163, 184))))
                .alignment(Alignment::Center),
        );
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Enter", Style::default().fg(Color::Rgb(200, 160, 30))),
            Span::styled(
                if is_register { " registrarse  " } else { " iniciar sesión  " },
                Style::default().fg(Color::Rgb(80, 85, 105)),
            ),
            Span::styled("Tab", Style::default().fg(Color::Rgb(200, 160, 30))),
            Span::styled(" campo  ", Style::default().fg(Color::Rgb(80, 85, 105))),
            Span::styled("Ctrl+T", Style::default().fg(Color::Rgb(200, 160, 30))),
            Span::styled(
                if is_register { " ya tengo cuenta" } else { " crear cuenta" },
                Style::default().fg(Color::Rgb(80, 85, 105)),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn push_field(lines: &mut Vec<Line<'static>>, label: &str, value: &str, mask: bool, focused: bool) {
    let label_fg = if focused { Color::Rgb(14, 165, 233) } else { Color::Rgb(100, 116, 139) };
    lines.push(Line::from(Span::styled(
        format!("  {label}"),
        Style::default().fg(label_fg).add_modifier(Modifier::BOLD),
    )));

    let shown: String = if mask { "•".repeat(value.chars().count()) } else { value.to_string() };
    let caret = if focused { "█" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("  ❯ ", Style::default().fg(label_fg)),
        Span::styled(shown, Style::default().fg(Color::White)),
        Span::styled(caret.to_string(), Style::default().fg(Color::Rgb(14, 165, 233))),
    ]));
    lines.push(Line::raw(""));
}
