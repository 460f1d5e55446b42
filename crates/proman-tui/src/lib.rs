mod keymap;
mod session;
#[cfg(test)]
mod test_support;
mod theme;
mod ui;

use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use proman_app::App;
use proman_app::inventory::ProgressReporter;
use proman_app::record::RepositoryRecord;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

use crate::session::{Session, Signal};
use crate::ui::progress::{FetchProgress, LoadingState, render_loading_modal};

const TICK_RATE: Duration = Duration::from_millis(120);

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_terminal(&mut CrosstermSetup)?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Restores the terminal from outside a session, e.g. from a panic hook.
pub fn restore_terminal() {
    let mut out = stdout();
    let _ = execute!(out, Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Steps that put the terminal into dashboard mode and take it back out.
trait TerminalSetup {
    type Terminal;

    fn enable_raw_mode(&mut self) -> Result<()>;
    fn enter_alt_screen(&mut self) -> Result<()>;
    fn create_terminal(&mut self) -> Result<Self::Terminal>;
    fn leave_alt_screen(&mut self) -> Result<()>;
    fn disable_raw_mode(&mut self) -> Result<()>;
}

struct CrosstermSetup;

impl TerminalSetup for CrosstermSetup {
    type Terminal = Terminal<CrosstermBackend<Stdout>>;

    fn enable_raw_mode(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide).context("failed to enter alternate screen")
    }

    fn create_terminal(&mut self) -> Result<Self::Terminal> {
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal backend")
    }

    fn leave_alt_screen(&mut self) -> Result<()> {
        let mut out = stdout();
        execute!(out, Show, LeaveAlternateScreen).context("failed to leave alternate screen")
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")
    }
}

/// How far setup got before a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStage {
    RawMode,
    AltScreen,
}

/// A failed step undoes the earlier ones in reverse order.
fn enter_terminal<S: TerminalSetup>(setup: &mut S) -> Result<S::Terminal> {
    setup.enable_raw_mode()?;
    if let Err(error) = setup.enter_alt_screen() {
        return Err(undo_setup(setup, SetupStage::RawMode, error));
    }
    match setup.create_terminal() {
        Ok(terminal) => Ok(terminal),
        Err(error) => Err(undo_setup(setup, SetupStage::AltScreen, error)),
    }
}

fn undo_setup<S: TerminalSetup>(
    setup: &mut S,
    reached: SetupStage,
    error: anyhow::Error,
) -> anyhow::Error {
    let mut leftovers = Vec::new();
    if reached == SetupStage::AltScreen
        && let Err(cleanup) = setup.leave_alt_screen()
    {
        leftovers.push(format!("{cleanup:#}"));
    }
    if let Err(cleanup) = setup.disable_raw_mode() {
        leftovers.push(format!("{cleanup:#}"));
    }

    if leftovers.is_empty() {
        error
    } else {
        tracing::warn!(leftovers = %leftovers.join("; "), "terminal only partly restored");
        error.context(format!("terminal only partly restored ({})", leftovers.join("; ")))
    }
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Redraws the loading modal after every fetched record.
struct TerminalProgress<'t> {
    terminal: &'t mut TerminalSession,
    loading: LoadingState,
    progress: FetchProgress,
}

impl ProgressReporter for TerminalProgress<'_> {
    fn on_record(&mut self, processed: usize, total_hint: Option<usize>, record: &RepositoryRecord) {
        self.progress = FetchProgress {
            processed,
            total_hint,
            current: Some(record.identity().to_string()),
        };
        self.loading.next_frame();

        let message = self.progress.message();
        let loading = &self.loading;
        if let Err(error) = self.terminal.draw(|frame| {
            render_loading_modal(frame, "Loading", &message, "Please wait", loading);
        }) {
            tracing::warn!(error = %format!("{error:#}"), "failed to draw fetch progress");
        }
    }
}

/// Runs the dashboard until the user quits.
pub fn run_dashboard(app: &App<'_>) -> Result<()> {
    let mut terminal = TerminalSession::enter()?;
    let mut session = Session::new(&app.settings.projects_root);

    loop {
        terminal.draw(|frame| session.render(frame))?;
        session.after_draw();

        if session.is_loading() {
            let mut reporter = TerminalProgress {
                terminal: &mut terminal,
                loading: LoadingState::default(),
                progress: FetchProgress::default(),
            };
            session.load(app, &mut reporter);
            continue;
        }

        if session.has_pending() {
            session.run_pending(app);
            continue;
        }

        let has_event = event::poll(TICK_RATE).context("failed to poll terminal event")?;
        if !has_event {
            continue;
        }

        let key = match event::read().context("failed to read terminal event")? {
            Event::Resize(_, _) => {
                terminal.autoresize()?;
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        if is_ctrl_c(key) {
            tracing::info!(screen = ?session.screen(), "dashboard interrupted");
            return Ok(());
        }

        if session.on_key(key, app) == Signal::Quit {
            tracing::info!("dashboard closed");
            return Ok(());
        }
    }
}

/// A box of the given percentages in the middle of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y.min(100))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x.min(100))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
