// ABOUTME: End-to-end tests for a single question through App::ask with a scripted transport.
// ABOUTME: Covers replies, fallback, attachment validation, and history persistence on disk.

use std::sync::Mutex;

use async_trait::async_trait;

use loanchat::app::App;
use loanchat::chat::{ChatRequest, ChatTransport, Encoding, FALLBACK_REPLY, Message, RequestError};
use loanchat::config::Config;
use loanchat::session::{FileKvStore, HISTORY_KEY, KvStore, SessionStore};

/// Transport that returns one canned result and records what it was sent.
struct Scripted {
    reply: Mutex<Option<Result<String, RequestError>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl Scripted {
    fn new(reply: Result<String, RequestError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for Scripted {
    async fn send(&self, request: ChatRequest) -> Result<String, RequestError> {
        self.seen.lock().unwrap().push(request);
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(RequestError::Transport("script exhausted".to_string())))
    }
}

fn config_in(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.display().to_string();
    config
}

#[tokio::test]
async fn question_gets_reply_and_is_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    let app = App::new(config_in(tmp.path()), false, true);
    let transport = Scripted::new(Ok("Hi there".to_string()));

    let reply = app.ask(&transport, "Hello", None).await.unwrap();
    assert_eq!(reply, "Hi there");

    let raw = FileKvStore::new(tmp.path()).get(HISTORY_KEY).unwrap().unwrap();
    let stored: Vec<Message> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, vec![Message::user("Hello"), Message::bot("Hi there")]);
}

#[tokio::test]
async fn history_accumulates_across_runs() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());

    App::new(config.clone(), false, true)
        .ask(&Scripted::new(Ok("first".to_string())), "one", None)
        .await
        .unwrap();
    App::new(config, false, true)
        .ask(&Scripted::new(Ok("second".to_string())), "two", None)
        .await
        .unwrap();

    let session = SessionStore::load(Box::new(FileKvStore::new(tmp.path())));
    let texts: Vec<&str> = session.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "first", "two", "second"]);
}

#[tokio::test]
async fn failure_yields_fallback_reply() {
    let app = App::new(Config::default(), false, false);
    let transport = Scripted::new(Err(RequestError::Status(500)));

    let reply = app.ask(&transport, "Hello", None).await.unwrap();
    assert_eq!(reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn empty_question_without_pdf_is_an_error() {
    let app = App::new(Config::default(), false, false);
    let transport = Scripted::new(Ok("unused".to_string()));

    assert!(app.ask(&transport, "   ", None).await.is_err());
    assert_eq!(transport.requests(), 0);
}

#[tokio::test]
async fn non_pdf_attachment_is_refused_before_sending() {
    let tmp = tempfile::tempdir().unwrap();
    let png = tmp.path().join("scan.png");
    std::fs::write(&png, b"png").unwrap();

    let app = App::new(config_in(tmp.path()), false, true);
    let transport = Scripted::new(Ok("unused".to_string()));

    let err = app.ask(&transport, "check this", Some(&png)).await.unwrap_err();
    assert_eq!(err.to_string(), "Please select only PDF files");
    assert_eq!(transport.requests(), 0);
    assert!(!tmp.path().join("chatMessages.json").exists());
}

#[tokio::test]
async fn pdf_only_question_sends_attachment() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = tmp.path().join("offer.pdf");
    std::fs::write(&pdf, b"%PDF-1.7").unwrap();

    let app = App::new(Config::default(), false, false);
    let transport = Scripted::new(Ok("Received your PDF".to_string()));

    let reply = app.ask(&transport, "", Some(&pdf)).await.unwrap();
    assert_eq!(reply, "Received your PDF");

    let seen = transport.seen.lock().unwrap();
    let attachment = seen[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.name, "offer.pdf");
    assert_eq!(attachment.mime, "application/pdf");
    assert_eq!(seen[0].message, "");
}

#[tokio::test]
async fn json_encoding_refuses_pdf_before_anything_is_recorded() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = tmp.path().join("offer.pdf");
    std::fs::write(&pdf, b"%PDF-1.7").unwrap();

    let mut config = config_in(tmp.path());
    config.api.encoding = Encoding::Json;
    let app = App::new(config, false, true);
    let transport = Scripted::new(Ok("unused".to_string()));

    let err = app.ask(&transport, "Is this ok?", Some(&pdf)).await.unwrap_err();
    assert_eq!(err.to_string(), "PDF upload needs the multipart encoding");
    assert_eq!(transport.requests(), 0);
    assert!(!tmp.path().join("chatMessages.json").exists());
}
