//! Colours and borders shared by every dashboard screen.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders};

const ACCENT: Color = Color::Cyan;

pub(crate) fn panel<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
}

pub(crate) fn keys_panel() -> Block<'static> {
    panel("Keys")
}

pub(crate) fn column_header() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_row() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Rows for repositories that have a working copy on disk.
pub(crate) fn cloned_row() -> Style {
    Style::default().fg(Color::Green)
}

pub(crate) fn private_badge() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn dirty_status() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

pub(crate) fn heading() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
}

pub(crate) fn notice_title() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

pub(crate) fn failure_title() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub(crate) fn field_label() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}
