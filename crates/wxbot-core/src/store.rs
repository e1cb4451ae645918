//! Subscriber store: in-memory list mirrored to a JSON file on every
//! mutation.

use std::{fs, path::PathBuf};

use crate::{
    domain::{ChatId, Subscriber},
    Error, Result,
};

/// Write-through store for daily-push subscribers.
///
/// The file is read once at process start and rewritten in full after every
/// mutation; it is never read concurrently with a write.
#[derive(Debug)]
pub struct SubscriberStore {
    path: PathBuf,
    subscribers: Vec<Subscriber>,
}

impl SubscriberStore {
    /// Load the persisted list, or start empty when the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let subscribers = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, subscribers })
    }

    pub fn is_subscribed(&self, chat_id: ChatId) -> bool {
        self.subscribers.iter().any(|s| s.chat_id == chat_id)
    }

    /// Append a record unless the chat is already subscribed, then persist.
    ///
    /// A persistence failure is reported after the in-memory append; callers
    /// decide whether to roll back or log and continue.
    pub fn subscribe(&mut self, chat_id: ChatId, location: impl Into<String>) -> Result<()> {
        if self.is_subscribed(chat_id) {
            return Err(Error::AlreadySubscribed);
        }
        self.subscribers.push(Subscriber {
            chat_id,
            location: location.into(),
        });
        self.persist()
    }

    /// Remove the chat if present. Removing a non-member still succeeds and
    /// still persists.
    pub fn unsubscribe(&mut self, chat_id: ChatId) -> Result<()> {
        self.subscribers.retain(|s| s.chat_id != chat_id);
        self.persist()
    }

    /// Snapshot for the scheduler fan-out.
    pub fn list(&self) -> Vec<Subscriber> {
        self.subscribers.clone()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.subscribers)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
