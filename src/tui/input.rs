// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Handles question typing, the upload path prompt, alerts, and the disabled Sending mode.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::state::TuiState;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User pressed Enter on the question input.
    Submit(String),
    /// User asked to attach a file.
    OpenUpload,
    /// User picked a file in the upload prompt.
    SelectFile(PathBuf),
    /// User removed the pending attachment.
    RemoveAttachment,
    /// User asked to clear the history.
    Clear,
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    if key.kind == KeyEventKind::Release {
        return InputResult::None;
    }

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    // An alert swallows the next key.
    if state.has_alert() {
        state.dismiss_alert();
        return InputResult::None;
    }

    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    if state.in_upload_prompt() {
        return handle_upload_key(state, key);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('l') => InputResult::Clear,
            KeyCode::Char('u') if !state.sending => InputResult::OpenUpload,
            KeyCode::Char('r') if !state.sending => InputResult::RemoveAttachment,
            _ => InputResult::None,
        };
    }

    if key.code == KeyCode::Esc {
        return InputResult::Quit;
    }

    // The input is disabled while a request is in flight.
    if state.sending {
        return InputResult::None;
    }

    match key.code {
        KeyCode::Enter => InputResult::Submit(state.input.clone()),
        _ => {
            edit_key(state, key.code);
            InputResult::None
        }
    }
}

/// Keys accepted while the upload prompt owns the input buffer.
fn handle_upload_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Enter => match state.close_upload_prompt() {
            Some(path) => InputResult::SelectFile(expand_home(&path)),
            None => InputResult::None,
        },
        KeyCode::Esc => {
            let _ = state.close_upload_prompt();
            InputResult::None
        }
        // Chords are not path text.
        _ if key.modifiers.contains(KeyModifiers::CONTROL) => InputResult::None,
        code => {
            edit_key(state, code);
            InputResult::None
        }
    }
}

/// Cursor movement and text editing shared by both input modes.
fn edit_key(state: &mut TuiState, code: KeyCode) {
    match code {
        KeyCode::Char(c) => state.insert_char_at_cursor(c),
        KeyCode::Backspace => state.backspace_char(),
        KeyCode::Delete => state.delete_char_at_cursor(),
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Home => state.move_cursor_home(),
        KeyCode::End => state.move_cursor_end(),
        _ => {}
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            true
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            true
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            true
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
