// ABOUTME: App orchestrator — wires together config, session storage, HTTP transport, and the TUI.
// ABOUTME: Runs the terminal event loop, or a single question in one-shot mode.

use std::io::stdout;
use std::path::Path;
use std::sync::Arc;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    EventStream,
};
use crossterm::execute;
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::chat::{ChatTransport, HttpTransport, Outbound, RequestPipeline, Settlement};
use crate::config::Config;
use crate::session::{FileKvStore, KvStore, MemoryKvStore, SessionStore};
use crate::tui::{ChatApp, Command, Msg, TuiState};

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    fresh: bool,
    persist: bool,
}

impl App {
    /// Create a new app. `fresh` clears the stored history on start; `persist = false`
    /// keeps history in memory only.
    pub fn new(config: Config, fresh: bool, persist: bool) -> Self {
        Self {
            config,
            fresh,
            persist,
        }
    }

    /// Load the session from the configured backend.
    pub fn open_session(&self) -> SessionStore {
        let store: Box<dyn KvStore> = if self.persist {
            Box::new(FileKvStore::new(self.config.data_dir()))
        } else {
            Box::new(MemoryKvStore::new())
        };
        let mut session = SessionStore::load(store);
        if self.fresh && !session.is_empty() {
            log::info!("--fresh: clearing {} stored messages", session.len());
            session.clear();
        }
        session
    }

    /// Build the HTTP transport from config.
    pub fn transport(&self) -> anyhow::Result<HttpTransport> {
        HttpTransport::new(
            &self.config.api.endpoint,
            self.config.timeout(),
            self.config.api.encoding,
        )
    }

    /// Run the application: set up subsystems and drive the TUI until quit.
    pub async fn run(self) -> anyhow::Result<()> {
        let transport: Arc<dyn ChatTransport> = Arc::new(self.transport()?);
        let session = self.open_session();
        let state = TuiState::new(&self.config.ui, self.config.api.endpoint.clone());
        let mut app = ChatApp::new(session, state).with_encoding(self.config.api.encoding);

        log::info!(
            "starting TUI against {} ({} messages restored)",
            self.config.api.endpoint,
            app.session.len()
        );

        let mut terminal = ratatui::init();
        if let Err(e) = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste) {
            log::warn!("could not enable mouse/paste capture: {}", e);
        }

        let result = event_loop(&mut terminal, &mut app, transport).await;

        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
        ratatui::restore();

        result?;
        print_exit_screen(&app);
        Ok(())
    }

    /// Send one question (and optional PDF) over HTTP, returning the appended reply text.
    pub async fn ask_once(&self, text: &str, pdf: Option<&Path>) -> anyhow::Result<String> {
        let transport = self.transport()?;
        self.ask(&transport, text, pdf).await
    }

    /// Send one question through the pipeline using `transport`.
    pub async fn ask(
        &self,
        transport: &dyn ChatTransport,
        text: &str,
        pdf: Option<&Path>,
    ) -> anyhow::Result<String> {
        let mut pipeline = RequestPipeline::for_encoding(self.config.api.encoding);
        if let Some(path) = pdf {
            pipeline.select_file(path)?;
        }
        let mut session = self.open_session();

        match pipeline.submit(&mut session, transport, text).await {
            Some(Settlement::Replied) | Some(Settlement::Fallback) => Ok(session
                .messages()
                .last()
                .map(|m| m.text.clone())
                .unwrap_or_default()),
            Some(other) => anyhow::bail!("request settled without a reply: {:?}", other),
            None => anyhow::bail!("nothing to send: give a question or a PDF"),
        }
    }
}

/// Redraw, wait for the next terminal event or reply, and apply it.
async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut ChatApp,
    transport: Arc<dyn ChatTransport>,
) -> anyhow::Result<()> {
    let (reply_tx, mut reply_rx) = mpsc::channel::<Msg>(4);
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| app.view(frame))?;

        let msg = tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => Msg::Key(key),
                Some(Ok(Event::Mouse(mouse))) => Msg::Mouse(mouse),
                Some(Ok(Event::Paste(text))) => Msg::Paste(text),
                // Resize and focus changes only need a redraw.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(reply) = reply_rx.recv() => reply,
        };

        match app.update(msg) {
            Command::None => {}
            Command::Send(outbound) => spawn_request(transport.clone(), outbound, reply_tx.clone()),
            Command::Quit => return Ok(()),
        }
    }
}

/// Run the request off the event loop and report its settlement back as a `Msg::Reply`.
fn spawn_request(transport: Arc<dyn ChatTransport>, outbound: Outbound, tx: mpsc::Sender<Msg>) {
    tokio::spawn(async move {
        let generation = outbound.generation;
        let result = transport.send(outbound.request).await;
        let _ = tx.send(Msg::Reply { generation, result }).await;
    });
}

/// Print a farewell screen after the TUI exits.
fn print_exit_screen(app: &ChatApp) {
    let elapsed = crate::tui::widgets::status::format_elapsed(
        app.state.session_start.elapsed().as_secs(),
    );
    let msg_count = app.session.len();

    println!();
    println!("  \u{1f3e6} \x1b[1mThanks for using loanchat!\x1b[0m");
    println!();
    println!("  \u{1f550} Session lasted {elapsed} with {msg_count} messages in history.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_clears_persisted_history() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = tmp.path().display().to_string();

        let mut session = App::new(config.clone(), false, true).open_session();
        session.append(crate::chat::Message::user("old question"));

        let kept = App::new(config.clone(), false, true).open_session();
        assert_eq!(kept.len(), 1);

        let fresh = App::new(config.clone(), true, true).open_session();
        assert!(fresh.is_empty());

        let reloaded = App::new(config, false, true).open_session();
        assert!(reloaded.is_empty(), "fresh start persists the cleared history");
    }

    #[test]
    fn no_persist_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = tmp.path().display().to_string();

        let mut session = App::new(config, false, false).open_session();
        session.append(crate::chat::Message::user("ephemeral"));
        assert!(!tmp.path().join("chatMessages.json").exists());
    }
}
