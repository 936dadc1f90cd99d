// ABOUTME: ChatApp — the Elm-style model tying the session, request pipeline, and screen state together.
// ABOUTME: update() folds terminal events and request settlements into state and returns a Command.

use std::path::Path;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;

use crate::chat::{AttachmentError, Encoding, Outbound, RequestError, RequestPipeline, Settlement};
use crate::session::SessionStore;
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::TuiState;
use crate::tui::ui;

const MOUSE_SCROLL_STEP: u16 = 3;

/// Messages that drive the ChatApp update cycle.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    /// The outstanding request settled.
    Reply {
        generation: u64,
        result: Result<String, RequestError>,
    },
}

/// Side effects requested by `update`, executed by the event loop.
#[derive(Debug)]
pub enum Command {
    None,
    /// Hand this request to the transport and report back with `Msg::Reply`.
    Send(Outbound),
    Quit,
}

impl Command {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

/// The top-level TUI application state.
pub struct ChatApp {
    pub session: SessionStore,
    pub pipeline: RequestPipeline,
    pub state: TuiState,
}

impl ChatApp {
    pub fn new(session: SessionStore, state: TuiState) -> Self {
        Self {
            session,
            pipeline: RequestPipeline::new(),
            state,
        }
    }

    /// Send requests with `encoding`. JSON mode has no upload affordance.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.pipeline = RequestPipeline::for_encoding(encoding);
        self
    }

    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::Key(key) => match handle_key(&mut self.state, key) {
                InputResult::None => Command::None,
                InputResult::Submit(text) => self.submit(&text),
                InputResult::OpenUpload => {
                    if self.pipeline.accepts_attachments() {
                        self.state.open_upload_prompt();
                    } else {
                        self.state.show_alert(AttachmentError::UploadUnavailable.to_string());
                    }
                    Command::None
                }
                InputResult::SelectFile(path) => {
                    self.select_file(&path);
                    Command::None
                }
                InputResult::RemoveAttachment => {
                    self.pipeline.remove_attachment();
                    Command::None
                }
                InputResult::Clear => {
                    self.session.clear();
                    self.state.scroll_to_bottom();
                    Command::None
                }
                InputResult::Quit => Command::Quit,
            },
            Msg::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        self.state.scroll_offset =
                            self.state.scroll_offset.saturating_add(MOUSE_SCROLL_STEP);
                    }
                    MouseEventKind::ScrollDown => {
                        self.state.scroll_offset =
                            self.state.scroll_offset.saturating_sub(MOUSE_SCROLL_STEP);
                    }
                    _ => {}
                }
                Command::None
            }
            Msg::Paste(text) => {
                if !self.state.sending && !self.state.has_alert() {
                    self.state.insert_str_at_cursor(&text);
                }
                Command::None
            }
            Msg::Reply { generation, result } => {
                self.settle(generation, result);
                Command::None
            }
        }
    }

    pub fn view(&mut self, frame: &mut Frame) {
        ui::render(frame, self);
    }

    /// Start a submission from the current input, if the pipeline accepts it.
    fn submit(&mut self, text: &str) -> Command {
        match self.pipeline.begin(&mut self.session, text) {
            Some(outbound) => {
                self.state.sending = true;
                self.state.scroll_to_bottom();
                Command::Send(outbound)
            }
            None => Command::None,
        }
    }

    /// Apply a settled request and reset the input affordances.
    fn settle(&mut self, generation: u64, result: Result<String, RequestError>) -> Settlement {
        let outcome = self.pipeline.settle(&mut self.session, generation, result);
        if outcome != Settlement::NotSending {
            self.state.sending = false;
            self.state.clear_input();
            self.state.scroll_to_bottom();
        }
        outcome
    }

    /// Validate a picked file; refusals become a blocking alert and change nothing else.
    fn select_file(&mut self, path: &Path) {
        if self.pipeline.is_sending() {
            return;
        }
        if let Err(e) = self.pipeline.select_file(path) {
            log::info!("attachment rejected: {:?}", e);
            self.state.show_alert(e.to_string());
        }
    }
}
