use ratatui::Frame;
use ratatui::text::{Line, Text};

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingState {
    frame_index: usize,
}

impl LoadingState {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    fn current_frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }
}

/// What the loading modal shows while records stream in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FetchProgress {
    pub(crate) processed: usize,
    pub(crate) total_hint: Option<usize>,
    pub(crate) current: Option<String>,
}

impl FetchProgress {
    pub(crate) fn message(&self) -> String {
        let counter = match self.total_hint {
            Some(total) if total >= self.processed => {
                format!("{}/~{total}", self.processed)
            }
            _ => self.processed.to_string(),
        };

        match &self.current {
            Some(identity) => format!("Fetched {counter} repositories: {identity}"),
            None => "Fetching repositories...".to_string(),
        }
    }
}

pub(crate) fn render_loading_modal(
    frame: &mut Frame<'_>,
    title: &str,
    message: &str,
    key_hint: &str,
    loading: &LoadingState,
) {
    let body = Text::from(vec![
        Line::from(""),
        Line::from(format!("{} {}", loading.current_frame(), message)),
    ]);
    render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(theme::heading()),
            body,
            key_hint: Some(key_hint),
            width_pct: 72,
            height_pct: 42,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::{FRAMES, FetchProgress, LoadingState};

    #[test]
    fn spinner_wraps_around() {
        let mut loading = LoadingState::default();
        for _ in 0..FRAMES.len() {
            loading.next_frame();
        }
        assert_eq!(loading.current_frame(), FRAMES[0]);
    }

    #[test]
    fn message_before_first_record() {
        assert_eq!(FetchProgress::default().message(), "Fetching repositories...");
    }

    #[test]
    fn message_includes_hint_only_while_it_is_plausible() {
        let mut progress = FetchProgress {
            processed: 3,
            total_hint: Some(200),
            current: Some("u/a".to_string()),
        };
        assert_eq!(progress.message(), "Fetched 3/~200 repositories: u/a");

        progress.total_hint = Some(2);
        assert_eq!(progress.message(), "Fetched 3 repositories: u/a");
    }
}
