use ratatui::layout::Alignment;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

pub(crate) const CONTINUE_HINT: &str = "press any key to continue";

/// One key legend in three lengths; the footer picks the one that fits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyHints {
    pub(crate) full: &'static str,
    pub(crate) medium: &'static str,
    pub(crate) compact: &'static str,
}

impl KeyHints {
    pub(crate) fn for_width(&self, width: u16) -> &'static str {
        match width {
            110.. => self.full,
            78..=109 => self.medium,
            _ => self.compact,
        }
    }
}

pub(crate) fn wrapped_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    wrapped_paragraph(text).alignment(Alignment::Center)
}

/// Bordered footer height for `text`, never below three rows.
pub(crate) fn footer_height(total_width: u16, text: &str) -> u16 {
    let inner = usize::from(total_width.saturating_sub(2).max(1));
    let rows: usize = text.split('\n').map(|line| rows_for(line, inner)).sum();
    u16::try_from(rows.max(1))
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .max(3)
}

/// Character-level wrap; tabs count as four columns.
fn rows_for(line: &str, width: usize) -> usize {
    let columns: usize = line
        .chars()
        .map(|ch| if ch == '\t' { 4 } else { 1 })
        .sum();
    columns.div_ceil(width.max(1)).max(1)
}

pub(crate) fn heading_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::heading()))
}

pub(crate) fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), theme::field_label()),
        Span::raw(value.into()),
    ])
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use super::{KeyHints, field_line, footer_height, heading_line, or_dash, rows_for, yes_no};

    const HINTS: KeyHints = KeyHints {
        full: "full",
        medium: "medium",
        compact: "compact",
    };

    #[test]
    fn key_hints_pick_variant_by_width() {
        assert_eq!(HINTS.for_width(120), "full");
        assert_eq!(HINTS.for_width(110), "full");
        assert_eq!(HINTS.for_width(90), "medium");
        assert_eq!(HINTS.for_width(60), "compact");
    }

    #[test]
    fn footer_is_three_rows_when_hint_fits() {
        assert_eq!(footer_height(80, "Enter: open    q: quit"), 3);
    }

    #[test]
    fn footer_grows_when_hint_wraps() {
        let height = footer_height(20, "Enter: open    j/k: move    c: create    r: refresh");
        assert!(height > 3);
    }

    #[test]
    fn rows_count_spaces_and_tabs() {
        assert_eq!(rows_for("a    b", 3), 2);
        assert_eq!(rows_for("a b", 3), 1);
        assert_eq!(rows_for("\t", 3), 2);
        assert_eq!(rows_for("", 3), 1);
    }

    #[test]
    fn heading_line_uses_blue_bold_style() {
        let line = heading_line("choose a repository");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].style.fg, Some(Color::Blue));
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn field_line_formats_with_colon() {
        let line = field_line("Stars", "12");
        assert_eq!(line.spans[0].content.as_ref(), "Stars: ");
        assert_eq!(line.spans[1].content.as_ref(), "12");
    }

    #[test]
    fn missing_and_empty_values_render_as_dash() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Rust")), "Rust");
    }
}
