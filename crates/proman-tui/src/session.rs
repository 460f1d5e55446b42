//! Screen state machine for the dashboard.
//!
//! `Session` owns the inventory and the selection. Keys move it between the
//! Loading, List, Detail, Prompt and Error screens; actions go through
//! [`DashboardOps`] and come back as a notice the user dismisses.

use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyEvent};
use proman_app::App;
use proman_app::dispatch::{
    ActionEffect, ActionError, ActionOutcome, Confirmation, LocalDeletePreview,
};
use proman_app::inventory::{FetchFailure, Inventory, ProgressReporter};
use proman_app::record::RepositoryRecord;
use proman_core::local_state::LocalState;
use proman_core::remote::{NewRepository, RepositoryEdit};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Text};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::keymap::{self, DetailKey, ListKey, PromptKey};
use crate::theme;
use crate::ui::detail::render_detail;
use crate::ui::modal::{render_error_modal, render_notice_modal};
use crate::ui::progress::{FetchProgress, LoadingState, render_loading_modal};
use crate::ui::prompt::{PromptView, render_prompt};
use crate::ui::repo_table::render_repo_table;
use crate::ui::text::{
    CONTINUE_HINT, KeyHints, footer_height, heading_line, key_hint_paragraph, wrapped_paragraph,
};

const LIST_KEYS: KeyHints = KeyHints {
    full: "Enter: details    Up/Down or j/k: move    c: create    r: refresh    q/Esc: quit",
    medium: "Enter: details    j/k: move    c: create    r: refresh    q: quit",
    compact: "Enter open | j/k | c new | r reload | q quit",
};

const DETAIL_KEYS: KeyHints = KeyHints {
    full: "l: clone    L: delete local    d: delete remote    e: edit    g: open in editor    b/q/Esc: back",
    medium: "l: clone    L: delete local    d: delete remote    e: edit    g: editor    b: back",
    compact: "l clone | L rm local | d rm remote | e edit | g editor | b back",
};

pub(crate) trait DashboardOps {
    fn fetch_inventory(
        &self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<Inventory, FetchFailure>;
    fn refresh_local_state(&self, inventory: &mut Inventory, index: usize) -> Option<LocalState>;
    fn clone_target_exists(&self, inventory: &Inventory, index: usize)
    -> Result<bool, ActionError>;
    fn clone_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        overwrite: Confirmation,
    ) -> Result<ActionOutcome, ActionError>;
    fn local_delete_preview(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<LocalDeletePreview, ActionError>;
    fn delete_local(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError>;
    fn delete_remote(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError>;
    fn edit_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        edit: RepositoryEdit,
    ) -> Result<ActionOutcome, ActionError>;
    fn create_repository(&self, request: NewRepository) -> Result<ActionOutcome, ActionError>;
    fn open_in_editor(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<ActionOutcome, ActionError>;
}

impl<'a> DashboardOps for App<'a> {
    fn fetch_inventory(
        &self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<Inventory, FetchFailure> {
        App::fetch_inventory(self, reporter)
    }

    fn refresh_local_state(&self, inventory: &mut Inventory, index: usize) -> Option<LocalState> {
        App::refresh_local_state(self, inventory, index)
    }

    fn clone_target_exists(
        &self,
        inventory: &Inventory,
        index: usize,
    ) -> Result<bool, ActionError> {
        App::clone_target_exists(self, inventory, index)
    }

    fn clone_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        overwrite: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        App::clone_repository(self, inventory, index, overwrite)
    }

    fn local_delete_preview(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<LocalDeletePreview, ActionError> {
        App::local_delete_preview(self, inventory, index)
    }

    fn delete_local(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        App::delete_local(self, inventory, index, confirmation)
    }

    fn delete_remote(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        App::delete_remote(self, inventory, index, confirmation)
    }

    fn edit_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        edit: RepositoryEdit,
    ) -> Result<ActionOutcome, ActionError> {
        App::edit_repository(self, inventory, index, edit)
    }

    fn create_repository(&self, request: NewRepository) -> Result<ActionOutcome, ActionError> {
        App::create_repository(self, request)
    }

    fn open_in_editor(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<ActionOutcome, ActionError> {
        App::open_in_editor(self, inventory, index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Loading,
    List,
    Detail,
    Prompt,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Info,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) kind: NoticeKind,
    pub(crate) message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptStep {
    ConfirmOverwrite {
        index: usize,
        path: PathBuf,
    },
    ConfirmDeleteLocal {
        index: usize,
        preview: LocalDeletePreview,
    },
    ConfirmDeleteRemote {
        index: usize,
        identity: String,
    },
    EditName {
        index: usize,
    },
    EditDescription {
        index: usize,
        name: Option<String>,
    },
    EditVisibility {
        index: usize,
        name: Option<String>,
        description: Option<String>,
    },
    CreateName,
    CreateDescription {
        name: String,
    },
    CreateVisibility {
        name: String,
        description: Option<String>,
    },
}

impl PromptStep {
    fn title(&self) -> &'static str {
        match self {
            Self::ConfirmOverwrite { .. } => "Overwrite local copy",
            Self::ConfirmDeleteLocal { .. } => "Delete local copy",
            Self::ConfirmDeleteRemote { .. } => "Delete remote repository",
            Self::EditName { .. } | Self::EditDescription { .. } | Self::EditVisibility { .. } => {
                "Edit repository"
            }
            Self::CreateName | Self::CreateDescription { .. } | Self::CreateVisibility { .. } => {
                "Create repository"
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ConfirmOverwrite { .. } => "Overwrite? (y/N)",
            Self::ConfirmDeleteLocal { .. } | Self::ConfirmDeleteRemote { .. } => {
                "Delete? (y/N)"
            }
            Self::EditName { .. } | Self::CreateName => "Name",
            Self::EditDescription { .. } => "Description",
            Self::CreateDescription { .. } => "Description (optional)",
            Self::EditVisibility { .. } => "Private? (y/n)",
            Self::CreateVisibility { .. } => "Private? (y/N)",
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match self {
            Self::ConfirmOverwrite { path, .. } => vec![
                heading_line(format!("{} already exists.", path.display())),
                Line::from("It is removed before cloning again."),
            ],
            Self::ConfirmDeleteLocal { preview, .. } => {
                let dirty = match preview.dirty {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "unknown",
                };
                let sync = match preview.ahead_behind {
                    Some(counts) => format!("{} ahead, {} behind", counts.ahead, counts.behind),
                    None => "unknown".to_string(),
                };
                vec![
                    heading_line(format!("Remove {}?", preview.local_path.display())),
                    Line::from(format!("Uncommitted changes: {dirty}")),
                    Line::from(format!("Upstream: {sync}")),
                ]
            }
            Self::ConfirmDeleteRemote { identity, .. } => vec![
                heading_line(format!("{identity} will be deleted on GitHub.")),
                Line::from("This cannot be undone."),
            ],
            Self::EditName { .. } | Self::EditDescription { .. } | Self::EditVisibility { .. } => {
                vec![Line::from("Empty input keeps the current value.")]
            }
            Self::CreateName => vec![Line::from("An empty name cancels.")],
            Self::CreateDescription { name } | Self::CreateVisibility { name, .. } => {
                vec![heading_line(format!("New repository: {name}"))]
            }
        }
    }
}

#[derive(Debug)]
struct Prompt {
    origin: Screen,
    step: PromptStep,
    input: Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingAction {
    Clone {
        index: usize,
        overwrite: Confirmation,
    },
    DeleteLocal {
        index: usize,
    },
    DeleteRemote {
        index: usize,
    },
    Edit {
        index: usize,
        edit: RepositoryEdit,
    },
    Create(NewRepository),
    OpenEditor {
        index: usize,
    },
}

#[derive(Debug)]
struct Pending {
    action: PendingAction,
    origin: Screen,
}

pub(crate) struct Session {
    screen: Screen,
    inventory: Inventory,
    selected: usize,
    projects_root: PathBuf,
    status_message: Option<String>,
    notice: Option<Notice>,
    prompt: Option<Prompt>,
    pending: Option<Pending>,
    fatal_error: Option<String>,
}

impl Session {
    pub(crate) fn new(projects_root: &Path) -> Self {
        Self {
            screen: Screen::Loading,
            inventory: Inventory::default(),
            selected: 0,
            projects_root: projects_root.to_path_buf(),
            status_message: None,
            notice: None,
            prompt: None,
            pending: None,
            fatal_error: None,
        }
    }

    pub(crate) fn screen(&self) -> Screen {
        self.screen
    }

    #[cfg(test)]
    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    #[cfg(test)]
    pub(crate) fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[cfg(test)]
    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    #[cfg(test)]
    fn prompt_value(&self) -> Option<&str> {
        self.prompt.as_ref().map(|prompt| prompt.input.value())
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.screen == Screen::Loading
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fetches the inventory. Failure is terminal for the session.
    pub(crate) fn load(&mut self, ops: &dyn DashboardOps, reporter: &mut dyn ProgressReporter) {
        match ops.fetch_inventory(reporter) {
            Ok(inventory) => {
                self.inventory = inventory;
                self.clamp_selection();
                self.screen = Screen::List;
            }
            Err(failure) => {
                tracing::error!(error = %failure, "inventory fetch failed");
                self.fatal_error = Some(failure.to_string());
                self.screen = Screen::Error;
            }
        }
    }

    /// The status line is shown for one draw only.
    pub(crate) fn after_draw(&mut self) {
        self.status_message = None;
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, ops: &dyn DashboardOps) -> Signal {
        if self.screen == Screen::Error {
            return Signal::Quit;
        }
        if self.notice.take().is_some() || self.pending.is_some() {
            return Signal::Continue;
        }

        match self.screen {
            Screen::List => self.on_list_key(key),
            Screen::Detail => {
                self.on_detail_key(key, ops);
                Signal::Continue
            }
            Screen::Prompt => {
                self.on_prompt_key(key, ops);
                Signal::Continue
            }
            Screen::Loading | Screen::Error => Signal::Continue,
        }
    }

    /// Runs the action staged by the last key, after its working message was drawn.
    pub(crate) fn run_pending(&mut self, ops: &dyn DashboardOps) {
        let Some(Pending { action, origin }) = self.pending.take() else {
            return;
        };

        let result = match action {
            PendingAction::Clone { index, overwrite } => {
                ops.clone_repository(&mut self.inventory, index, overwrite)
            }
            PendingAction::DeleteLocal { index } => {
                let result = ops.delete_local(&mut self.inventory, index, Confirmation::Confirmed);
                if matches!(result, Err(ActionError::RemoveFailed { .. })) {
                    ops.refresh_local_state(&mut self.inventory, index);
                }
                result
            }
            PendingAction::DeleteRemote { index } => {
                ops.delete_remote(&mut self.inventory, index, Confirmation::Confirmed)
            }
            PendingAction::Edit { index, edit } => {
                ops.edit_repository(&mut self.inventory, index, edit)
            }
            PendingAction::Create(request) => ops.create_repository(request),
            PendingAction::OpenEditor { index } => ops.open_in_editor(&mut self.inventory, index),
        };

        self.apply_result(result, origin);
    }

    fn on_list_key(&mut self, key: KeyEvent) -> Signal {
        match keymap::list_key(key) {
            Some(ListKey::Quit) => return Signal::Quit,
            Some(ListKey::Up) => self.selected = self.selected.saturating_sub(1),
            Some(ListKey::Down) => {
                if self.selected + 1 < self.inventory.len() {
                    self.selected += 1;
                }
            }
            Some(ListKey::Open) => {
                if !self.inventory.is_empty() {
                    self.screen = Screen::Detail;
                }
            }
            Some(ListKey::Create) => {
                self.open_prompt(Screen::List, PromptStep::CreateName, String::new());
            }
            Some(ListKey::Refresh) => self.screen = Screen::Loading,
            None => {}
        }

        Signal::Continue
    }

    fn on_detail_key(&mut self, key: KeyEvent, ops: &dyn DashboardOps) {
        let Some(action) = keymap::detail_key(key) else {
            return;
        };
        if action == DetailKey::Back {
            self.screen = Screen::List;
            return;
        }

        let index = self.selected;
        let Some(record) = self.inventory.get(index) else {
            return;
        };

        match action {
            DetailKey::Clone => match ops.clone_target_exists(&self.inventory, index) {
                Ok(true) => {
                    let path = record.local_path().to_path_buf();
                    self.open_prompt(
                        Screen::Detail,
                        PromptStep::ConfirmOverwrite { index, path },
                        String::new(),
                    );
                }
                Ok(false) => self.stage(
                    PendingAction::Clone {
                        index,
                        overwrite: Confirmation::Declined,
                    },
                    Screen::Detail,
                ),
                Err(error) => self.notice = Some(Notice::failure(error.to_string())),
            },
            DetailKey::DeleteLocal => match ops.local_delete_preview(&mut self.inventory, index) {
                Ok(preview) => self.open_prompt(
                    Screen::Detail,
                    PromptStep::ConfirmDeleteLocal { index, preview },
                    String::new(),
                ),
                Err(error) => self.notice = Some(Notice::failure(error.to_string())),
            },
            DetailKey::DeleteRemote => {
                let identity = record.identity().to_string();
                self.open_prompt(
                    Screen::Detail,
                    PromptStep::ConfirmDeleteRemote { index, identity },
                    String::new(),
                );
            }
            DetailKey::Edit => {
                let current = record.display_name.clone();
                self.open_prompt(Screen::Detail, PromptStep::EditName { index }, current);
            }
            DetailKey::OpenEditor => {
                self.stage(PendingAction::OpenEditor { index }, Screen::Detail);
            }
            DetailKey::Back => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent, ops: &dyn DashboardOps) {
        match keymap::prompt_key(key) {
            Some(PromptKey::Cancel) => {
                if let Some(prompt) = self.prompt.take() {
                    self.screen = prompt.origin;
                }
            }
            Some(PromptKey::Submit) => match self.prompt.take() {
                Some(prompt) => self.submit_prompt(prompt, ops),
                None => self.screen = Screen::List,
            },
            None => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.handle_event(&Event::Key(key));
                }
            }
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt, ops: &dyn DashboardOps) {
        let value = prompt.input.value().trim().to_string();
        let origin = prompt.origin;

        match prompt.step {
            PromptStep::ConfirmOverwrite { index, path } => {
                let overwrite = Confirmation::from_input(&value);
                if overwrite.is_confirmed() {
                    self.stage(PendingAction::Clone { index, overwrite }, origin);
                } else {
                    self.screen = origin;
                    self.notice = Some(Notice::info(format!(
                        "Clone cancelled; {} left untouched",
                        path.display()
                    )));
                }
            }
            PromptStep::ConfirmDeleteLocal { index, .. } => {
                let confirmation = Confirmation::from_input(&value);
                if confirmation.is_confirmed() {
                    self.stage(PendingAction::DeleteLocal { index }, origin);
                } else {
                    let result = ops.delete_local(&mut self.inventory, index, confirmation);
                    self.apply_result(result, origin);
                }
            }
            PromptStep::ConfirmDeleteRemote { index, .. } => {
                let confirmation = Confirmation::from_input(&value);
                if confirmation.is_confirmed() {
                    self.stage(PendingAction::DeleteRemote { index }, origin);
                } else {
                    let result = ops.delete_remote(&mut self.inventory, index, confirmation);
                    self.apply_result(result, origin);
                }
            }
            PromptStep::EditName { index } => {
                let current = self.inventory.get(index);
                let name = changed(&value, current.map(|record| record.display_name.as_str()));
                let description = current
                    .and_then(|record| record.description.clone())
                    .unwrap_or_default();
                self.open_prompt(
                    origin,
                    PromptStep::EditDescription { index, name },
                    description,
                );
            }
            PromptStep::EditDescription { index, name } => {
                let current = self.inventory.get(index);
                let description = changed(
                    &value,
                    Some(
                        current
                            .and_then(|record| record.description.as_deref())
                            .unwrap_or_default(),
                    ),
                );
                let private = current.is_some_and(|record| record.is_private);
                self.open_prompt(
                    origin,
                    PromptStep::EditVisibility {
                        index,
                        name,
                        description,
                    },
                    if private { "y" } else { "n" }.to_string(),
                );
            }
            PromptStep::EditVisibility {
                index,
                name,
                description,
            } => {
                let current = self.inventory.get(index).map(|record| record.is_private);
                let private = if value.is_empty() {
                    None
                } else {
                    let requested = Confirmation::from_input(&value).is_confirmed();
                    (Some(requested) != current).then_some(requested)
                };
                let edit = RepositoryEdit {
                    name,
                    description,
                    private,
                };
                if edit.is_empty() {
                    let result = ops.edit_repository(&mut self.inventory, index, edit);
                    self.apply_result(result, origin);
                } else {
                    self.stage(PendingAction::Edit { index, edit }, origin);
                }
            }
            PromptStep::CreateName => {
                if value.is_empty() {
                    self.screen = origin;
                    self.notice = Some(Notice::info("Create cancelled: no name given"));
                } else {
                    self.open_prompt(
                        origin,
                        PromptStep::CreateDescription { name: value },
                        String::new(),
                    );
                }
            }
            PromptStep::CreateDescription { name } => {
                let description = (!value.is_empty()).then_some(value);
                self.open_prompt(
                    origin,
                    PromptStep::CreateVisibility { name, description },
                    String::new(),
                );
            }
            PromptStep::CreateVisibility { name, description } => {
                let private = Confirmation::from_input(&value).is_confirmed();
                self.stage(
                    PendingAction::Create(NewRepository {
                        name,
                        description,
                        private,
                    }),
                    origin,
                );
            }
        }
    }

    fn open_prompt(&mut self, origin: Screen, step: PromptStep, initial: String) {
        self.prompt = Some(Prompt {
            origin,
            step,
            input: Input::new(initial),
        });
        self.screen = Screen::Prompt;
    }

    fn stage(&mut self, action: PendingAction, origin: Screen) {
        self.status_message = Some(self.working_message(&action));
        self.pending = Some(Pending { action, origin });
        self.screen = origin;
    }

    fn working_message(&self, action: &PendingAction) -> String {
        let identity = |index: usize| {
            self.inventory
                .get(index)
                .map(|record| record.identity().to_string())
                .unwrap_or_else(|| "repository".to_string())
        };

        match action {
            PendingAction::Clone { index, .. } => format!("Cloning {}...", identity(*index)),
            PendingAction::DeleteLocal { index } => {
                format!("Deleting local copy of {}...", identity(*index))
            }
            PendingAction::DeleteRemote { index } => format!("Deleting {}...", identity(*index)),
            PendingAction::Edit { index, .. } => format!("Updating {}...", identity(*index)),
            PendingAction::Create(request) => format!("Creating {}...", request.name),
            PendingAction::OpenEditor { index } => {
                format!("Opening {} in editor...", identity(*index))
            }
        }
    }

    fn apply_result(&mut self, result: Result<ActionOutcome, ActionError>, origin: Screen) {
        match result {
            Ok(outcome) => {
                let message = match outcome.audit_error {
                    Some(error) => format!("{} (audit log not written: {error})", outcome.summary),
                    None => outcome.summary,
                };
                self.notice = Some(Notice::info(message));
                self.screen = match outcome.effect {
                    ActionEffect::RecordRemoved => Screen::List,
                    ActionEffect::RefreshRequired => Screen::Loading,
                    ActionEffect::RecordUpdated
                    | ActionEffect::Unchanged
                    | ActionEffect::Cancelled => origin,
                };
            }
            Err(error) => {
                tracing::warn!(%error, "action failed");
                self.notice = Some(Notice::failure(error.to_string()));
                self.screen = origin;
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.inventory.len().saturating_sub(1));
    }

    fn selected_record(&self) -> Option<&RepositoryRecord> {
        self.inventory.get(self.selected)
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        match self.screen {
            Screen::Loading => {
                self.render_list(frame);
                render_loading_modal(
                    frame,
                    "Loading",
                    &FetchProgress::default().message(),
                    "Please wait",
                    &LoadingState::default(),
                );
            }
            Screen::List => self.render_list(frame),
            Screen::Detail => self.render_detail(frame),
            Screen::Prompt => {
                match self.prompt.as_ref().map(|prompt| prompt.origin) {
                    Some(Screen::Detail) => self.render_detail(frame),
                    _ => self.render_list(frame),
                }
                if let Some(prompt) = &self.prompt {
                    render_prompt(
                        frame,
                        PromptView {
                            title: prompt.step.title(),
                            lines: prompt.step.lines(),
                            label: prompt.step.label(),
                            input: &prompt.input,
                        },
                    );
                }
            }
            Screen::Error => {
                let message = self.fatal_error.as_deref().unwrap_or("unknown error");
                render_error_modal(
                    frame,
                    &format!("Could not load repositories.\n\n{message}"),
                    80,
                    60,
                    "Any key: exit",
                );
            }
        }

        if let Some(notice) = &self.notice {
            let footer = format!("Any key: continue ({CONTINUE_HINT})");
            match notice.kind {
                NoticeKind::Info => {
                    render_notice_modal(frame, "Done", &notice.message, 72, 30, &footer)
                }
                NoticeKind::Failure => render_error_modal(frame, &notice.message, 72, 36, &footer),
            }
        }
    }

    fn render_list(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = LIST_KEYS.for_width(area.width);
        let footer_height = footer_height(area.width, key_text);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let cloned = self
            .inventory
            .records()
            .iter()
            .filter(|record| record.is_cloned_locally())
            .count();
        let header_text = Text::from(vec![
            Line::from(format!(
                "{} repositories, {cloned} cloned under {}",
                self.inventory.len(),
                self.projects_root.display()
            )),
            self.status_line("Select a repository"),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::panel("proman")),
            header,
        );

        render_repo_table(
            frame,
            body,
            heading_line("Repositories"),
            &self.inventory,
            self.selected,
        );
        frame.render_widget(key_hint_paragraph(key_text).block(theme::keys_panel()), footer);
    }

    fn render_detail(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = DETAIL_KEYS.for_width(area.width);
        let footer_height = footer_height(area.width, key_text);
        let [status, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        frame.render_widget(
            wrapped_paragraph(self.status_line("Choose an action")).block(theme::panel("proman")),
            status,
        );
        render_detail(frame, body, self.selected_record());
        frame.render_widget(key_hint_paragraph(key_text).block(theme::keys_panel()), footer);
    }

    fn status_line(&self, idle: &str) -> Line<'static> {
        match &self.status_message {
            Some(message) => Line::styled(message.clone(), theme::notice_title()),
            None => heading_line(idle.to_string()),
        }
    }
}

/// `None` when the input is empty or matches the current value.
fn changed(input: &str, current: Option<&str>) -> Option<String> {
    if input.is_empty() || Some(input) == current {
        None
    } else {
        Some(input.to_string())
    }
}
