//! Mentor chat conversation.
//!
//! # Responsibility
//! - Append user messages and queue the canned mentor reply.
//! - Deliver queued replies when the caller polls past their due time.
//!
//! # Invariants
//! - Blank input is ignored.
//! - Replies are delivered in due order and at most once.
//! - The conversation lives in memory only.

use crate::observable::{Observable, SubscriptionId};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

pub const MENTOR_REPLY: &str = "I'm here to help! What would you like to discuss?";
pub const MENTOR_REPLY_DELAY_MS: i64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub is_from_mentor: bool,
}

impl ChatMessage {
    fn new(content: impl Into<String>, timestamp: i64, is_from_mentor: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            timestamp,
            is_from_mentor,
        }
    }
}

#[derive(Default)]
pub struct MentorChat {
    messages: Observable<Vec<ChatMessage>>,
    pending_replies: VecDeque<i64>,
}

impl MentorChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.messages.get()
    }

    pub fn pending_reply_count(&self) -> usize {
        self.pending_replies.len()
    }

    /// Appends a user message. Returns `None` for blank input.
    pub fn send(&mut self, text: &str, now_ms: i64) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        let message = ChatMessage::new(text, now_ms, false);
        let mut next = self.messages.snapshot();
        next.push(message.clone());
        self.messages.set(next);
        self.pending_replies.push_back(now_ms + MENTOR_REPLY_DELAY_MS);
        Some(message)
    }

    /// Appends every mentor reply due at or before `now_ms`.
    /// Returns how many were delivered.
    pub fn deliver_due(&mut self, now_ms: i64) -> usize {
        let mut next = self.messages.snapshot();
        let mut delivered = 0;
        while let Some(&due) = self.pending_replies.front() {
            if due > now_ms {
                break;
            }
            self.pending_replies.pop_front();
            next.push(ChatMessage::new(MENTOR_REPLY, due, true));
            delivered += 1;
        }
        if delivered > 0 {
            self.messages.set(next);
        }
        delivered
    }

    pub fn subscribe(
        &mut self,
        callback: impl Fn(&Vec<ChatMessage>) + Send + 'static,
    ) -> SubscriptionId {
        self.messages.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::{MentorChat, MENTOR_REPLY};

    #[test]
    fn blank_messages_are_ignored() {
        let mut chat = MentorChat::new();
        assert!(chat.send("   ", 0).is_none());
        assert!(chat.messages().is_empty());
        assert_eq!(chat.pending_reply_count(), 0);
    }

    #[test]
    fn reply_arrives_only_once_due() {
        let mut chat = MentorChat::new();
        chat.send("hello", 10_000).unwrap();

        assert_eq!(chat.deliver_due(10_999), 0);
        assert_eq!(chat.messages().len(), 1);

        assert_eq!(chat.deliver_due(11_000), 1);
        let reply = &chat.messages()[1];
        assert!(reply.is_from_mentor);
        assert_eq!(reply.content, MENTOR_REPLY);
        assert_eq!(reply.timestamp, 11_000);

        assert_eq!(chat.deliver_due(50_000), 0);
    }

    #[test]
    fn replies_follow_send_order() {
        let mut chat = MentorChat::new();
        chat.send("one", 0).unwrap();
        chat.send("two", 500).unwrap();
        assert_eq!(chat.deliver_due(1_600), 2);
        let authors: Vec<bool> = chat.messages().iter().map(|m| m.is_from_mentor).collect();
        assert_eq!(authors, [false, false, true, true]);
    }
}
