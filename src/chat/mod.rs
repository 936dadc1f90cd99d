// ABOUTME: Chat module — messages, PDF attachments, the outbound transport, and the request pipeline.
// ABOUTME: Everything here is independent of the terminal front end.

pub mod attachment;
pub mod message;
pub mod pipeline;
pub mod transport;

pub use attachment::{AttachmentError, MAX_ATTACHMENT_BYTES, PDF_MIME, PendingAttachment};
pub use message::{FALLBACK_REPLY, Message, Sender};
pub use pipeline::{Outbound, RequestPipeline, RequestState, Settlement};
pub use transport::{ChatRequest, ChatTransport, Encoding, HttpTransport, RequestError};
