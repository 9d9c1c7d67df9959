//! Ordered conversation log for a single session.

use crate::types::{MessageParam, MessageRole};

/// An append-only list of messages, cleared only on request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageHistory {
    entries: Vec<MessageParam>,
}

impl MessageHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the end.
    pub fn push(&mut self, entry: MessageParam) {
        self.entries.push(entry);
    }

    /// Returns every entry, oldest first.
    pub fn snapshot(&self) -> &[MessageParam] {
        &self.entries
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recent entry.
    pub fn last(&self) -> Option<&MessageParam> {
        self.entries.last()
    }

    /// Returns true if the last entry is a user message with no reply.
    pub fn has_dangling_user_entry(&self) -> bool {
        matches!(self.last(), Some(entry) if entry.role == MessageRole::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut history = MessageHistory::new();
        history.push(MessageParam::user("one"));
        history.push(MessageParam::assistant("two"));
        history.push(MessageParam::user("one"));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0], MessageParam::user("one"));
        assert_eq!(snapshot[1], MessageParam::assistant("two"));
        assert_eq!(snapshot[2], MessageParam::user("one"));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = MessageHistory::new();
        history.push(MessageParam::user("hello"));
        assert!(!history.is_empty());

        history.clear();
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
        assert_eq!(history.last(), None);
    }

    #[test]
    fn dangling_user_entry() {
        let mut history = MessageHistory::new();
        assert!(!history.has_dangling_user_entry());
        history.push(MessageParam::user("hello"));
        assert!(history.has_dangling_user_entry());
        history.push(MessageParam::assistant("hi"));
        assert!(!history.has_dangling_user_entry());
    }
}
