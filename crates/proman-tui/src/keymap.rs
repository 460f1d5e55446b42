//! Key bindings per screen. Character bindings are case-sensitive (`l` vs `L`).

use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKey {
    Up,
    Down,
    Open,
    Create,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailKey {
    Clone,
    DeleteLocal,
    DeleteRemote,
    Edit,
    OpenEditor,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptKey {
    Submit,
    Cancel,
}

pub(crate) fn list_key(key: KeyEvent) -> Option<ListKey> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ListKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(ListKey::Down),
        KeyCode::Enter => Some(ListKey::Open),
        KeyCode::Char('c') => Some(ListKey::Create),
        KeyCode::Char('r') => Some(ListKey::Refresh),
        KeyCode::Char('q') | KeyCode::Esc => Some(ListKey::Quit),
        _ => None,
    }
}

pub(crate) fn detail_key(key: KeyEvent) -> Option<DetailKey> {
    match key.code {
        KeyCode::Char('l') => Some(DetailKey::Clone),
        KeyCode::Char('L') => Some(DetailKey::DeleteLocal),
        KeyCode::Char('d') => Some(DetailKey::DeleteRemote),
        KeyCode::Char('e') => Some(DetailKey::Edit),
        KeyCode::Char('g') => Some(DetailKey::OpenEditor),
        KeyCode::Char('b') | KeyCode::Char('q') | KeyCode::Esc => Some(DetailKey::Back),
        _ => None,
    }
}

/// `None` means the key goes to the input field.
pub(crate) fn prompt_key(key: KeyEvent) -> Option<PromptKey> {
    match key.code {
        KeyCode::Enter => Some(PromptKey::Submit),
        KeyCode::Esc => Some(PromptKey::Cancel),
        _ => None,
    }
}
