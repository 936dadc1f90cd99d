// ABOUTME: TUI state types — input buffer with cursor, scroll position, upload prompt, and alerts.
// ABOUTME: Holds only presentation state; the history and request lifecycle live in the chat model.

use std::time::Instant;

use crate::config::UiConfig;

/// Presentation state of the chat screen.
pub struct TuiState {
    pub input: String,
    pub cursor_pos: usize,
    /// Lines scrolled up from the bottom of the chat (0 = pinned to latest).
    pub scroll_offset: u16,
    /// Mirrors the pipeline's Sending state; disables the input.
    pub sending: bool,
    /// Blocking message shown until the next key press.
    pub alert: Option<String>,
    /// Chat input saved while the upload prompt borrows the input buffer.
    stashed_input: Option<(String, usize)>,
    pub title: String,
    pub subtitle: String,
    pub placeholder: String,
    pub endpoint: String,
    pub session_start: Instant,
}

impl TuiState {
    pub fn new(ui: &UiConfig, endpoint: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            sending: false,
            alert: None,
            stashed_input: None,
            title: ui.title.clone(),
            subtitle: ui.subtitle.clone(),
            placeholder: ui.placeholder.clone(),
            endpoint: endpoint.into(),
            session_start: Instant::now(),
        }
    }

    /// Pin the chat view to the newest message.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Whether the input buffer currently holds a file path rather than a question.
    pub fn in_upload_prompt(&self) -> bool {
        self.stashed_input.is_some()
    }

    /// Switch the input buffer to path entry, keeping the typed question aside.
    pub fn open_upload_prompt(&mut self) {
        if self.in_upload_prompt() {
            return;
        }
        let question = std::mem::take(&mut self.input);
        self.stashed_input = Some((question, self.cursor_pos));
        self.cursor_pos = 0;
    }

    /// Leave path entry, returning the trimmed path if one was typed.
    pub fn close_upload_prompt(&mut self) -> Option<String> {
        let (question, cursor) = self.stashed_input.take()?;
        let path = std::mem::replace(&mut self.input, question);
        self.cursor_pos = cursor;
        let path = path.trim();
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }

    /// Empty the input buffer.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert pasted text at the cursor. Newlines become spaces since the input is one line.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            self.insert_char_at_cursor(c);
        }
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TuiState {
        TuiState::new(&UiConfig::default(), "http://localhost/api/chat")
    }

    #[test]
    fn new_state_is_empty() {
        let state = state();
        assert_eq!(state.input, "");
        assert_eq!(state.cursor_pos, 0);
        assert_eq!(state.scroll_offset, 0);
        assert!(!state.sending);
        assert!(!state.has_alert());
        assert!(!state.in_upload_prompt());
        assert_eq!(state.endpoint, "http://localhost/api/chat");
    }

    #[test]
    fn utf8_input_editing_is_safe() {
        let mut state = state();
        state.insert_char_at_cursor('a');
        state.insert_char_at_cursor('🙂');
        state.insert_char_at_cursor('é');
        assert_eq!(state.input, "a🙂é");
        assert_eq!(state.cursor_pos, 3);

        state.move_cursor_left();
        state.backspace_char();
        assert_eq!(state.input, "aé");
        assert_eq!(state.cursor_pos, 1);

        state.delete_char_at_cursor();
        assert_eq!(state.input, "a");
        assert_eq!(state.cursor_pos, 1);
    }

    #[test]
    fn clamp_cursor_handles_out_of_range_positions() {
        let mut state = state();
        state.input = "hi🙂".to_string();
        state.cursor_pos = 999;
        state.clamp_cursor();
        assert_eq!(state.cursor_pos, 3);
        assert_eq!(state.cursor_byte_index(), state.input.len());
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut state = state();
        state.insert_str_at_cursor("line one\nline two");
        assert_eq!(state.input, "line one line two");
        assert_eq!(state.cursor_pos, 17);
    }

    #[test]
    fn upload_prompt_stashes_question() {
        let mut state = state();
        state.insert_str_at_cursor("Is this eligible?");
        state.open_upload_prompt();
        assert!(state.in_upload_prompt());
        assert_eq!(state.input, "");

        state.insert_str_at_cursor("  /tmp/offer.pdf ");
        let path = state.close_upload_prompt();
        assert_eq!(path.as_deref(), Some("/tmp/offer.pdf"));
        assert_eq!(state.input, "Is this eligible?");
        assert_eq!(state.cursor_pos, 17);
        assert!(!state.in_upload_prompt());
    }

    #[test]
    fn empty_upload_prompt_yields_none() {
        let mut state = state();
        state.open_upload_prompt();
        assert_eq!(state.close_upload_prompt(), None);
        assert_eq!(state.close_upload_prompt(), None, "already closed");
    }

    #[test]
    fn alert_show_and_dismiss() {
        let mut state = state();
        state.show_alert("Please select only PDF files");
        assert!(state.has_alert());
        state.dismiss_alert();
        assert!(!state.has_alert());
    }
}
