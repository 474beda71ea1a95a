use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who a transcript line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Interviewer question, answer or closing note
    Agent,
    /// Candidate answer
    User,
    /// Evaluation of the previous answer
    Feedback,
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// When this entry was appended
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Append-only message log in arrival order
///
/// Entries are never edited or removed. User answers whose turn request
/// failed are tracked by index in a side set instead.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    unconfirmed: BTreeSet<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index
    pub fn push(&mut self, kind: MessageKind, text: impl Into<String>) -> usize {
        self.messages.push(Message::new(kind, text));
        self.messages.len() - 1
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }

    pub fn mark_unconfirmed(&mut self, index: usize) {
        if index < self.messages.len() {
            self.unconfirmed.insert(index);
        }
    }

    pub fn confirm(&mut self, index: usize) {
        self.unconfirmed.remove(&index);
    }

    pub fn is_unconfirmed(&self, index: usize) -> bool {
        self.unconfirmed.contains(&index)
    }

    pub fn unconfirmed_count(&self) -> usize {
        self.unconfirmed.len()
    }
}
