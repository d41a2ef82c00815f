/// Reply formatter — turns a loosely-structured assistant reply into an
/// ordered sequence of render blocks.
///
/// The assistant writes markdown-ish text: bolded section labels
/// ("**Tratamiento:** …"), `* ` bullets, and `---` separators. This module is
/// the single source of truth for how that text becomes structure; both the
/// TUI and the plain one-shot printer render from the block sequence, so the
/// sequence itself is the contract and is covered by golden tests below.
///
/// Pure function of the input text. No styling decisions beyond the fixed
/// label → icon/color table.

// ── Blocks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Section(Section),
    Divider,
    /// A line outside any section, rendered as a standalone styled paragraph.
    Paragraph(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub icon: &'static str,
    /// Hex color ("#rrggbb") paired with the icon; parsed by ui::hex_rgb.
    pub color: &'static str,
    pub lines: Vec<SectionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLine {
    Text(String),
    Bullet(String),
}

// ── Label → icon/color ────────────────────────────────────────────────────────

/// Emoji a section header may be prefixed with ("🔍 **Diagnóstico**").
const HEADER_EMOJI: &[&str] = &["🔍", "📋", "💊", "💡", "⚠️"];

pub const DEFAULT_ICON: &str = "📌";
pub const DEFAULT_COLOR: &str = "#06b6d4";

/// Deterministic, total mapping from a section label to its icon/color pair.
/// Case-insensitive substring match, first hit wins.
pub fn section_style(title: &str) -> (&'static str, &'static str) {
    let lower = title.to_lowercase();
    if lower.contains("diagnóstico") {
        ("🔍", "#3b82f6")
    } else if lower.contains("descripción") {
        ("📋", "#6366f1")
    } else if lower.contains("tratamiento") {
        ("💊", "#10b981")
    } else if lower.contains("recomendaciones") {
        ("💡", "#f59e0b")
    } else if lower.contains("recordatorio") || lower.contains("importante") {
        ("⚠️", "#ef4444")
    } else if lower.contains("opción") {
        ("💊", "#10b981")
    } else {
        (DEFAULT_ICON, DEFAULT_COLOR)
    }
}

// ── Formatter ─────────────────────────────────────────────────────────────────

/// Single pass over the reply, line by line.
pub fn format_reply(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut section: Option<(String, Vec<SectionLine>)> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((title, rest)) = parse_bold_label(line) {
            flush(&mut blocks, &mut section);
            let mut lines = Vec::new();
            if !rest.is_empty() {
                lines.push(content_line(rest));
            }
            section = Some((title, lines));
        } else if let Some(title) = parse_emoji_header(line) {
            flush(&mut blocks, &mut section);
            section = Some((title, Vec::new()));
        } else if line.starts_with("**") && line.ends_with("**") {
            // Whole-bold line without a colon — header with no inline content.
            flush(&mut blocks, &mut section);
            section = Some((line.replace("**", "").trim().to_string(), Vec::new()));
        } else if line.starts_with("---") {
            flush(&mut blocks, &mut section);
            blocks.push(Block::Divider);
        } else if let Some((_, lines)) = section.as_mut() {
            lines.push(content_line(line));
        } else {
            blocks.push(Block::Paragraph(line.to_string()));
        }
    }

    flush(&mut blocks, &mut section);
    blocks
}

/// Emit the accumulated section, if it has any content. A header that never
/// accrued content lines emits nothing.
fn flush(blocks: &mut Vec<Block>, section: &mut Option<(String, Vec<SectionLine>)>) {
    if let Some((title, lines)) = section.take() {
        if !lines.is_empty() {
            let (icon, color) = section_style(&title);
            blocks.push(Block::Section(Section { title, icon, color, lines }));
        }
    }
}

fn content_line(line: &str) -> SectionLine {
    match line.strip_prefix("* ") {
        Some(rest) => SectionLine::Bullet(rest.to_string()),
        None => SectionLine::Text(line.to_string()),
    }
}

/// "**Label:** rest-of-line" → (Label, trimmed rest). The label ends at the
/// first ":**" so trailing bold spans in the rest are left alone.
fn parse_bold_label(line: &str) -> Option<(String, &str)> {
    let body = line.strip_prefix("**")?;
    let colon = body.find(":**")?;
    let title = body[..colon].trim().to_string();
    let rest = body[colon + 3..].trim();
    Some((title, rest))
}

/// "<emoji> **Label**" → Label. The whole remainder after the emoji must be
/// bold-wrapped.
fn parse_emoji_header(line: &str) -> Option<String> {
    for emoji in HEADER_EMOJI {
        if let Some(after) = line.strip_prefix(emoji) {
            let rest = after.trim_start();
            if rest.len() == after.len() {
                continue; // no whitespace between emoji and label
            }
            if rest.len() >= 4 && rest.starts_with("**") && rest.ends_with("**") {
                return Some(rest[2..rest.len() - 2].trim().to_string());
            }
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn section(blocks: &[Block], idx: usize) -> &Section {
        match &blocks[idx] {
            Block::Section(s) => s,
            other => panic!("expected section at {idx}, got {other:?}"),
        }
    }

    #[test]
    fn labeled_section_with_inline_content_and_bullets() {
        let blocks = format_reply("**Diagnóstico:** Posible gripe\n* Fiebre\n* Tos");
        assert_eq!(blocks.len(), 1);
        let s = section(&blocks, 0);
        assert_eq!(s.title, "Diagnóstico");
        assert_eq!(s.icon, "🔍");
        assert_eq!(s.color, "#3b82f6");
        assert_eq!(
            s.lines,
            vec![
                SectionLine::Text("Posible gripe".into()),
                SectionLine::Bullet("Fiebre".into()),
                SectionLine::Bullet("Tos".into()),
            ]
        );
    }

    #[test]
    fn lone_divider() {
        assert_eq!(format_reply("---"), vec![Block::Divider]);
    }

    #[test]
    fn loose_text_becomes_paragraph() {
        assert_eq!(
            format_reply("Texto suelto sin sección"),
            vec![Block::Paragraph("Texto suelto sin sección".into())]
        );
    }

    #[test]
    fn consecutive_labels_flush_without_separator() {
        let blocks = format_reply(
            "**Tratamiento:** Paracetamol\n**Recomendaciones:** Reposo y líquidos",
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(section(&blocks, 0).title, "Tratamiento");
        assert_eq!(section(&blocks, 0).icon, "💊");
        assert_eq!(section(&blocks, 1).title, "Recomendaciones");
        assert_eq!(section(&blocks, 1).icon, "💡");
    }

    #[test]
    fn emoji_header_opens_a_section() {
        let blocks = format_reply("⚠️ **Importante**\nConsulta a un médico");
        assert_eq!(blocks.len(), 1);
        let s = section(&blocks, 0);
        assert_eq!(s.title, "Importante");
        assert_eq!(s.icon, "⚠️");
        assert_eq!(s.lines, vec![SectionLine::Text("Consulta a un médico".into())]);
    }

    #[test]
    fn whole_bold_line_opens_a_section_without_inline_content() {
        let blocks = format_reply("**Opción A**\nIbuprofeno cada 8 horas");
        assert_eq!(blocks.len(), 1);
        let s = section(&blocks, 0);
        assert_eq!(s.title, "Opción A");
        assert_eq!(s.icon, "💊"); // "opción" match
        assert_eq!(s.lines, vec![SectionLine::Text("Ibuprofeno cada 8 horas".into())]);
    }

    #[test]
    fn header_without_content_emits_nothing() {
        // Original front end only renders a section once it has content lines.
        assert!(format_reply("**Diagnóstico:**").is_empty());
        assert!(format_reply("**Pendiente**").is_empty());
    }

    #[test]
    fn divider_flushes_open_section() {
        let blocks = format_reply("**Descripción:** Cuadro viral\n---\nNota final");
        assert_eq!(blocks.len(), 3);
        assert_eq!(section(&blocks, 0).title, "Descripción");
        assert_eq!(blocks[1], Block::Divider);
        assert_eq!(blocks[2], Block::Paragraph("Nota final".into()));
    }

    #[test]
    fn unknown_label_gets_default_marker() {
        let blocks = format_reply("**Notas:** algo");
        let s = section(&blocks, 0);
        assert_eq!(s.icon, DEFAULT_ICON);
        assert_eq!(s.color, DEFAULT_COLOR);
    }

    #[test]
    fn label_match_is_case_insensitive() {
        assert_eq!(section_style("POSIBLE DIAGNÓSTICO").0, "🔍");
        assert_eq!(section_style("Recordatorio final").0, "⚠️");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let blocks = format_reply("**Tratamiento:** Reposo\n\n* Agua\n\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(section(&blocks, 0).lines.len(), 2);
    }
}
