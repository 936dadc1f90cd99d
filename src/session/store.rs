// ABOUTME: Session store — the ordered chat history and its persisted snapshot.
// ABOUTME: Every append or clear overwrites the full JSON snapshot under a single fixed key.

use crate::chat::message::Message;
use crate::session::kv::KvStore;

/// Key under which the history snapshot is stored.
pub const HISTORY_KEY: &str = "chatMessages";

/// Owns the chat history. Append-only until cleared.
pub struct SessionStore {
    store: Box<dyn KvStore>,
    messages: Vec<Message>,
    generation: u64,
}

impl SessionStore {
    /// Restore the history from `store`. Missing or malformed snapshots yield an empty session.
    pub fn load(store: Box<dyn KvStore>) -> Self {
        let messages = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => messages,
                Err(e) => {
                    log::warn!("discarding malformed chat history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("could not read chat history: {}", e);
                Vec::new()
            }
        };
        log::debug!("loaded {} messages from history", messages.len());

        Self {
            store,
            messages,
            generation: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Incremented by every clear. Replies tagged with an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Add a message at the end and persist the whole history.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.persist();
    }

    /// Drop all messages and persist the empty snapshot.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
        self.persist();
    }

    /// Write failures are logged; the in-memory history stays authoritative.
    fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.messages) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("could not serialize chat history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &snapshot) {
            log::warn!("could not persist chat history: {}", e);
        }
    }
}
