//! In-memory bounded conversation window
//!
//! The only shared mutable cross-request state in the gateway. Callers wrap
//! it in a `tokio::sync::Mutex`; the buffer itself is plain data.

use std::collections::VecDeque;

use super::ChatMessage;

/// Hard cap on retained turns, independent of the prompt window
const MAX_RETAINED: usize = 10;

/// One completed exchange
#[derive(Debug, Clone)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

/// Bounded conversation history.
///
/// `window` turns feed each prompt; at most [`MAX_RETAINED`] turns are kept,
/// oldest dropped first. Nothing is ever persisted.
#[derive(Debug)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    window: usize,
}

impl ConversationHistory {
    /// Create a history with the given prompt window.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            window,
        }
    }

    /// Build the message list for one completion: system prompt, the last
    /// `window` turns, then the current user text.
    #[must_use]
    pub fn messages(&self, system_prompt: &str, user_text: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(system_prompt)];

        let skip = self.turns.len().saturating_sub(self.window);
        for turn in self.turns.iter().skip(skip) {
            messages.push(ChatMessage::user(turn.user.clone()));
            messages.push(ChatMessage::assistant(turn.assistant.clone()));
        }

        messages.push(ChatMessage::user(user_text));
        messages
    }

    /// Record a completed exchange, evicting the oldest beyond the cap.
    ///
    /// The raw model reply is what gets recorded — routing happens after the
    /// model has already seen its own words.
    pub fn record(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push_back(Turn {
            user: user.into(),
            assistant: assistant.into(),
        });
        while self.turns.len() > MAX_RETAINED {
            self.turns.pop_front();
        }
    }

    /// Number of retained turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether any turns are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
