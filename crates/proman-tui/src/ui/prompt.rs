use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Clear, Paragraph};
use tui_input::Input;

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

pub(crate) struct PromptView<'a> {
    pub(crate) title: &'a str,
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) label: &'a str,
    pub(crate) input: &'a Input,
}

pub(crate) const PROMPT_HINT: &str = "Enter: submit    Esc: cancel";

pub(crate) fn render_prompt(frame: &mut Frame<'_>, view: PromptView<'_>) {
    let mut body = view.lines;
    // Room for the input box drawn over the bottom of the body.
    body.extend([Line::from(""), Line::from(""), Line::from("")]);

    let rendered = render_modal(
        frame,
        ModalSpec {
            title: view.title,
            title_style: Some(theme::heading()),
            body: Text::from(body),
            key_hint: Some(PROMPT_HINT),
            width_pct: 72,
            height_pct: 50,
        },
    );

    let Some(area) = input_area(rendered.body_area) else {
        return;
    };
    render_input(frame, area, view.label, view.input);
}

fn input_area(body: Rect) -> Option<Rect> {
    if body.height < 5 || body.width < 4 {
        return None;
    }

    Some(Rect::new(
        body.x + 1,
        body.y + body.height - 4,
        body.width - 2,
        3,
    ))
}

fn render_input(frame: &mut Frame<'_>, area: Rect, label: &str, input: &Input) {
    let width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let paragraph = Paragraph::new(input.value())
        .scroll((0, scroll as u16))
        .block(theme::panel(label.to_string()));
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);

    if width == 0 {
        return;
    }

    let visual = input.visual_cursor();
    let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
    frame.set_cursor_position((area.x + 1 + relative as u16, area.y + 1));
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::input_area;

    #[test]
    fn input_box_sits_on_the_last_body_rows() {
        let body = Rect::new(10, 5, 40, 12);
        assert_eq!(input_area(body), Some(Rect::new(11, 13, 38, 3)));
    }

    #[test]
    fn tiny_body_has_no_input_box() {
        assert_eq!(input_area(Rect::new(0, 0, 40, 4)), None);
    }
}
