use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::users::UserStore;

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub username: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A message as served to clients: the stored entry joined with the
/// author's current profile picture at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntry {
    pub username: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub profile_picture: Option<String>,
}

/// Append-only shared chat log, ordered by insertion.
#[derive(Clone, Default)]
pub struct ChatLog {
    inner: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, username: &str, message: &str) {
        self.inner.lock().unwrap().push(ChatMessage {
            username: username.to_owned(),
            message: message.to_owned(),
            timestamp: Utc::now(),
        });
    }

    /// All messages in append order. The picture on each entry is whatever
    /// the author has set right now, not what they had when posting.
    pub fn list_all(&self, users: &UserStore) -> Vec<MessageEntry> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .map(|msg| MessageEntry {
                username: msg.username.clone(),
                message: msg.message.clone(),
                timestamp: msg.timestamp,
                profile_picture: users
                    .get_user(&msg.username)
                    .and_then(|u| u.profile_picture),
            })
            .collect()
    }
}
