// ABOUTME: TUI widget sub-modules for chat, attachment preview, prompts, and status bar.
// ABOUTME: Each widget is a pure rendering function producing ratatui Lines.

pub mod attachment;
pub mod chat;
pub mod prompt;
pub mod status;
