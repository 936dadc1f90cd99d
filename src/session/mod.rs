// ABOUTME: Session module — chat history ownership and its local key-value persistence.
// ABOUTME: SessionStore holds the messages; kv provides file and in-memory backends.

pub mod kv;
pub mod store;

pub use kv::{FileKvStore, KvStore, MemoryKvStore, StorageError};
pub use store::{HISTORY_KEY, SessionStore};
