use proman_app::inventory::Inventory;
use proman_app::record::RepositoryRecord;
use ratatui::Frame;
use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{
    Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState,
};

use crate::theme;

const COLUMNS: [(&str, Constraint); 5] = [
    ("Repository", Constraint::Percentage(38)),
    ("Visibility", Constraint::Length(10)),
    ("Local", Constraint::Length(10)),
    ("Status", Constraint::Percentage(22)),
    ("Language", Constraint::Percentage(18)),
];

pub(crate) fn visibility_label(record: &RepositoryRecord) -> &'static str {
    if record.is_private {
        "private"
    } else {
        "public"
    }
}

pub(crate) fn local_label(record: &RepositoryRecord) -> &'static str {
    if record.is_cloned_locally() {
        "cloned"
    } else {
        "-"
    }
}

/// Dirty flag plus ahead/behind counts; `?` where git could not tell.
pub(crate) fn status_label(record: &RepositoryRecord) -> String {
    if !record.is_cloned_locally() {
        return "-".to_string();
    }

    let dirty = match record.has_uncommitted_changes() {
        Some(true) => "dirty",
        Some(false) => "clean",
        None => "?",
    };
    match record.ahead_behind() {
        Some(counts) => format!("{dirty} +{} -{}", counts.ahead, counts.behind),
        None => format!("{dirty} +? -?"),
    }
}

pub(crate) fn render_repo_table(
    frame: &mut Frame<'_>,
    area: Rect,
    title: Line<'_>,
    inventory: &Inventory,
    selected: usize,
) {
    if inventory.is_empty() {
        let empty = Paragraph::new("No repositories found. Press c to create one.")
            .block(theme::panel(title));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|(name, _)| *name))
        .style(theme::column_header());
    let rows = inventory.records().iter().map(|record| {
        let style = if record.is_cloned_locally() {
            theme::cloned_row()
        } else {
            Style::default()
        };
        let visibility = if record.is_private {
            Cell::from(visibility_label(record)).style(theme::private_badge())
        } else {
            Cell::from(visibility_label(record))
        };
        let status = if record.has_uncommitted_changes() == Some(true) {
            Cell::from(status_label(record)).style(theme::dirty_status())
        } else {
            Cell::from(status_label(record))
        };
        Row::new(vec![
            Cell::from(record.identity().to_string()),
            visibility,
            Cell::from(local_label(record)),
            status,
            Cell::from(record.primary_language.clone().unwrap_or_default()),
        ])
        .style(style)
    });

    let table = Table::new(rows, COLUMNS.iter().map(|(_, width)| *width))
        .header(header)
        .block(theme::panel(title))
        .row_highlight_style(theme::selected_row())
        .highlight_symbol(">> ");

    let mut state = TableState::new();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);

    let viewport = area.height.saturating_sub(3) as usize;
    let mut scrollbar_state = ScrollbarState::new(inventory.len())
        .position(selected)
        .viewport_content_length(viewport);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

#[cfg(test)]
mod tests {
    use proman_core::git::AheadBehind;
    use proman_core::local_state::LocalState;

    use super::{local_label, status_label, visibility_label};
    use crate::test_support::record;

    #[test]
    fn uncloned_records_have_no_status() {
        let record = record("u/a");
        assert_eq!(local_label(&record), "-");
        assert_eq!(status_label(&record), "-");
        assert_eq!(visibility_label(&record), "public");
    }

    #[test]
    fn freshly_cloned_status_is_unknown() {
        let mut record = record("u/a");
        record.mark_cloned();
        assert_eq!(local_label(&record), "cloned");
        assert_eq!(status_label(&record), "? +? -?");
    }

    #[test]
    fn known_status_shows_dirty_and_counts() {
        let mut record = record("u/a");
        record.apply_local_state(LocalState::Cloned {
            dirty: Some(true),
            ahead_behind: Some(AheadBehind {
                ahead: 2,
                behind: 0,
            }),
        });
        assert_eq!(status_label(&record), "dirty +2 -0");
    }
}
