use proman_app::record::RepositoryRecord;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};

use crate::theme;
use crate::ui::repo_table::{status_label, visibility_label};
use crate::ui::text::{field_line, heading_line, or_dash, wrapped_paragraph, yes_no};

pub(crate) fn detail_lines(record: &RepositoryRecord) -> Vec<Line<'static>> {
    let mut lines = vec![heading_line(record.identity().to_string())];
    if record.display_name != record.short_name() {
        lines.push(field_line("Renamed to", record.display_name.clone()));
    }
    lines.push(Line::from(or_dash(record.description.as_deref())));
    lines.push(Line::from(""));

    lines.push(field_line("URL", record.web_url.clone()));
    lines.push(field_line("Visibility", visibility_label(record)));
    lines.push(field_line(
        "Stars / forks / open issues",
        format!(
            "{} / {} / {}",
            record.star_count, record.fork_count, record.open_issue_count
        ),
    ));
    lines.push(field_line(
        "Language",
        or_dash(record.primary_language.as_deref()),
    ));
    lines.push(field_line(
        "Default branch",
        or_dash(record.default_branch.as_deref()),
    ));
    lines.push(field_line("Archived", yes_no(record.archived)));
    lines.push(field_line("Disabled", yes_no(record.disabled)));
    let topics = record.topics.iter().cloned().collect::<Vec<_>>().join(", ");
    lines.push(field_line("Topics", or_dash(Some(topics.as_str()))));
    lines.push(field_line(
        "Created",
        or_dash(record.created_at.as_deref()),
    ));
    lines.push(field_line(
        "Updated",
        or_dash(record.updated_at.as_deref()),
    ));
    lines.push(Line::from(""));

    lines.push(field_line(
        "Local path",
        record.local_path().display().to_string(),
    ));
    lines.push(field_line(
        "Cloned",
        yes_no(record.is_cloned_locally()),
    ));
    lines.push(field_line("Status", status_label(record)));

    lines
}

pub(crate) fn render_detail(frame: &mut Frame<'_>, area: Rect, record: Option<&RepositoryRecord>) {
    let text = match record {
        Some(record) => Text::from(detail_lines(record)),
        None => Text::from("No repository selected."),
    };
    frame.render_widget(
        wrapped_paragraph(text).block(theme::panel(heading_line("Repository"))),
        area,
    );
}
