// ABOUTME: TUI module — ratatui full-screen chat interface for loanchat.
// ABOUTME: Chat display, attachment preview, upload prompt, alerts, input handling, and status bar.

pub mod input;
pub mod model;
pub mod state;
pub mod ui;
pub mod widgets;

pub use model::{ChatApp, Command, Msg};
pub use state::TuiState;
