// ABOUTME: Request pipeline — the Idle/Sending lifecycle around one outbound chat request.
// ABOUTME: Appends the user message optimistically, then maps the reply or failure into a bot message.

use crate::chat::attachment::{AttachmentError, PendingAttachment};
use crate::chat::message::Message;
use crate::chat::transport::{ChatRequest, ChatTransport, Encoding, RequestError};
use crate::session::SessionStore;

/// Whether a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    /// One request in flight, tagged with the session generation it was sent under.
    Sending { generation: u64 },
}

/// A request ready to hand to a transport, plus the generation it belongs to.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub request: ChatRequest,
    pub generation: u64,
}

/// What happened when a request settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The reply text was appended as a bot message.
    Replied,
    /// The request failed and the fallback message was appended.
    Fallback,
    /// The session was cleared while the request was in flight; nothing appended.
    Discarded,
    /// No request was outstanding.
    NotSending,
}

/// Drives submissions from composed input to an appended reply.
#[derive(Debug)]
pub struct RequestPipeline {
    state: RequestState,
    attachment: Option<PendingAttachment>,
    encoding: Encoding,
}

impl Default for RequestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestPipeline {
    pub fn new() -> Self {
        Self::for_encoding(Encoding::Multipart)
    }

    /// A pipeline whose requests go out with `encoding`. JSON bodies cannot carry a PDF,
    /// so file selection is refused for them.
    pub fn for_encoding(encoding: Encoding) -> Self {
        Self {
            state: RequestState::Idle,
            attachment: None,
            encoding,
        }
    }

    pub fn accepts_attachments(&self) -> bool {
        self.encoding == Encoding::Multipart
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, RequestState::Sending { .. })
    }

    pub fn attachment(&self) -> Option<&PendingAttachment> {
        self.attachment.as_ref()
    }

    /// Accept a validated attachment, replacing any previous selection.
    pub fn attach(&mut self, attachment: PendingAttachment) {
        log::info!(
            "attachment selected: {} ({} bytes)",
            attachment.name,
            attachment.size()
        );
        self.attachment = Some(attachment);
    }

    /// Validate and attach a file from disk. On error the current selection is untouched.
    pub fn select_file(&mut self, path: &std::path::Path) -> Result<(), AttachmentError> {
        if !self.accepts_attachments() {
            return Err(AttachmentError::UploadUnavailable);
        }
        let attachment = PendingAttachment::from_path(path)?;
        self.attach(attachment);
        Ok(())
    }

    pub fn remove_attachment(&mut self) {
        self.attachment = None;
    }

    /// Start a submission. Returns `None` when sending is already underway or there is
    /// nothing to send. Otherwise appends the user message and enters Sending.
    pub fn begin(&mut self, session: &mut SessionStore, text: &str) -> Option<Outbound> {
        if self.is_sending() {
            log::debug!("submission ignored: a request is already in flight");
            return None;
        }
        if text.trim().is_empty() && self.attachment.is_none() {
            return None;
        }

        session.append(Message::user(display_text(text, self.attachment.as_ref())));

        let generation = session.generation();
        self.state = RequestState::Sending { generation };
        log::info!(
            "sending question (generation {}, attachment: {})",
            generation,
            self.attachment.is_some()
        );

        Some(Outbound {
            request: ChatRequest {
                message: text.to_string(),
                attachment: self.attachment.clone(),
            },
            generation,
        })
    }

    /// Finish the in-flight request: append the reply or the fallback, then return to Idle
    /// and drop the attachment. Replies for a cleared session are discarded.
    pub fn settle(
        &mut self,
        session: &mut SessionStore,
        generation: u64,
        result: Result<String, RequestError>,
    ) -> Settlement {
        if !self.is_sending() {
            return Settlement::NotSending;
        }
        self.state = RequestState::Idle;
        self.attachment = None;

        if generation != session.generation() {
            log::info!(
                "discarding reply for generation {} (session is at {})",
                generation,
                session.generation()
            );
            return Settlement::Discarded;
        }

        match result {
            Ok(text) => {
                session.append(Message::bot(text));
                Settlement::Replied
            }
            Err(e) => {
                log::warn!("chat request failed: {}", e);
                session.append(Message::fallback());
                Settlement::Fallback
            }
        }
    }

    /// Run a whole submission against `transport`, awaiting the reply in place.
    pub async fn submit(
        &mut self,
        session: &mut SessionStore,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Option<Settlement> {
        let outbound = self.begin(session, text)?;
        let result = transport.send(outbound.request).await;
        Some(self.settle(session, outbound.generation, result))
    }
}

/// The text shown in the history for a user submission. The typed text is trimmed here,
/// so whitespace-only input with a PDF reads "Uploaded PDF: ..."; the request itself still
/// carries the text exactly as typed.
pub fn display_text(text: &str, attachment: Option<&PendingAttachment>) -> String {
    let typed = text.trim();
    match attachment {
        Some(att) if typed.is_empty() => format!("Uploaded PDF: {}", att.name),
        Some(att) => format!("{} (with attached PDF: {})", typed, att.name),
        None => typed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::chat::attachment::PDF_MIME;
    use crate::chat::message::{FALLBACK_REPLY, Sender};
    use crate::session::{HISTORY_KEY, MemoryKvStore};

    /// Transport that replays a fixed result and records what it was sent.
    struct ScriptedTransport {
        reply: Mutex<Option<Result<String, RequestError>>>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn ok(text: &str) -> Self {
            Self::with(Ok(text.to_string()))
        }

        fn err(e: RequestError) -> Self {
            Self::with(Err(e))
        }

        fn with(reply: Result<String, RequestError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, request: ChatRequest) -> Result<String, RequestError> {
            self.seen.lock().unwrap().push(request);
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(RequestError::Transport("script exhausted".into())))
        }
    }

    fn session() -> SessionStore {
        SessionStore::load(Box::new(MemoryKvStore::new()))
    }

    fn pdf(name: &str) -> PendingAttachment {
        PendingAttachment::new(name, PDF_MIME, b"%PDF".to_vec()).unwrap()
    }

    #[test]
    fn display_text_variants() {
        let att = pdf("salary.pdf");
        assert_eq!(display_text("Hello", None), "Hello");
        assert_eq!(display_text("", Some(&att)), "Uploaded PDF: salary.pdf");
        assert_eq!(display_text("   ", Some(&att)), "Uploaded PDF: salary.pdf");
        assert_eq!(
            display_text("Check this", Some(&att)),
            "Check this (with attached PDF: salary.pdf)"
        );
    }

    #[tokio::test]
    async fn hello_roundtrip() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();
        let transport = ScriptedTransport::ok("Hi there");

        let outcome = pipeline.submit(&mut session, &transport, "Hello").await;

        assert_eq!(outcome, Some(Settlement::Replied));
        assert_eq!(
            session.messages(),
            &[Message::user("Hello"), Message::bot("Hi there")]
        );
        assert_eq!(pipeline.state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn empty_submission_is_noop() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();
        let transport = ScriptedTransport::ok("unused");

        assert_eq!(pipeline.submit(&mut session, &transport, "   ").await, None);
        assert_eq!(pipeline.submit(&mut session, &transport, "").await, None);
        assert!(session.is_empty());
        assert_eq!(transport.calls(), 0);
        assert_eq!(session.store().get(HISTORY_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn failures_append_one_fallback() {
        let failures = [
            RequestError::Status(502),
            RequestError::Transport("connection reset".into()),
            RequestError::Timeout(std::time::Duration::from_millis(5000)),
            RequestError::Parse("missing field `response`".into()),
        ];
        for failure in failures {
            let mut session = session();
            let mut pipeline = RequestPipeline::new();
            let transport = ScriptedTransport::err(failure);

            let outcome = pipeline.submit(&mut session, &transport, "Hello").await;

            assert_eq!(outcome, Some(Settlement::Fallback));
            assert_eq!(session.len(), 2);
            assert_eq!(session.messages()[0], Message::user("Hello"));
            assert_eq!(session.messages()[1].sender, Sender::Bot);
            assert_eq!(session.messages()[1].text, FALLBACK_REPLY);
            assert!(!pipeline.is_sending());
        }
    }

    #[tokio::test]
    async fn attachment_only_submission() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();
        pipeline.attach(pdf("offer.pdf"));
        let transport = ScriptedTransport::ok("Looks fine");

        pipeline.submit(&mut session, &transport, "").await;

        assert_eq!(session.messages()[0].text, "Uploaded PDF: offer.pdf");
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].message, "");
        assert_eq!(seen[0].attachment.as_ref().unwrap().name, "offer.pdf");
        assert!(pipeline.attachment().is_none(), "attachment cleared after send");
    }

    #[tokio::test]
    async fn request_carries_unannotated_text() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();
        pipeline.attach(pdf("offer.pdf"));
        let transport = ScriptedTransport::err(RequestError::Status(500));

        pipeline.submit(&mut session, &transport, "Is this ok?").await;

        assert_eq!(
            session.messages()[0].text,
            "Is this ok? (with attached PDF: offer.pdf)"
        );
        assert_eq!(transport.seen.lock().unwrap()[0].message, "Is this ok?");
        assert!(pipeline.attachment().is_none(), "attachment cleared after failure");
    }

    #[test]
    fn second_submission_while_sending_is_ignored() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();

        let first = pipeline.begin(&mut session, "first");
        assert!(first.is_some());
        assert!(pipeline.is_sending());

        assert!(pipeline.begin(&mut session, "second").is_none());
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].text, "first");
    }

    #[test]
    fn reply_after_clear_is_discarded() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();

        let outbound = pipeline.begin(&mut session, "Hello").unwrap();
        session.clear();

        let outcome = pipeline.settle(&mut session, outbound.generation, Ok("late".into()));
        assert_eq!(outcome, Settlement::Discarded);
        assert!(session.is_empty());
        assert!(!pipeline.is_sending());
    }

    #[test]
    fn settle_without_request_is_noop() {
        let mut session = session();
        let mut pipeline = RequestPipeline::new();
        let outcome = pipeline.settle(&mut session, 0, Ok("stray".into()));
        assert_eq!(outcome, Settlement::NotSending);
        assert!(session.is_empty());
    }

    #[test]
    fn rejected_selection_keeps_previous_attachment() {
        let tmp = tempfile::tempdir().unwrap();
        let png = tmp.path().join("scan.png");
        std::fs::write(&png, b"png").unwrap();
        let good = tmp.path().join("terms.pdf");
        std::fs::write(&good, b"%PDF").unwrap();

        let mut session = session();
        let mut pipeline = RequestPipeline::new();

        assert!(pipeline.select_file(&png).is_err());
        assert!(pipeline.attachment().is_none());
        assert!(session.is_empty());

        pipeline.select_file(&good).unwrap();
        assert!(pipeline.select_file(&png).is_err());
        assert_eq!(pipeline.attachment().unwrap().name, "terms.pdf");
        assert!(session.is_empty());
    }

    #[test]
    fn new_selection_replaces_old() {
        let mut pipeline = RequestPipeline::new();
        pipeline.attach(pdf("a.pdf"));
        pipeline.attach(pdf("b.pdf"));
        assert_eq!(pipeline.attachment().unwrap().name, "b.pdf");
        pipeline.remove_attachment();
        assert!(pipeline.attachment().is_none());
    }

    #[test]
    fn json_pipeline_refuses_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("offer.pdf");
        std::fs::write(&good, b"%PDF").unwrap();

        let mut session = session();
        let mut pipeline = RequestPipeline::for_encoding(Encoding::Json);
        assert!(!pipeline.accepts_attachments());

        let err = pipeline.select_file(&good).unwrap_err();
        assert!(matches!(err, AttachmentError::UploadUnavailable));
        assert!(pipeline.attachment().is_none());

        let outbound = pipeline.begin(&mut session, "Is this ok?").unwrap();
        assert!(outbound.request.attachment.is_none());
        assert_eq!(session.messages()[0].text, "Is this ok?");
    }
}
