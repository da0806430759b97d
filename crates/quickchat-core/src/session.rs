//! Per-session composition state.
//!
//! A [`Session`] owns the counters the driver needs while composing: the
//! sequence number fed into message hashes and the number of messages that
//! count toward the session limit.

use tracing::debug;

use crate::account::{ValidationError, check_message_length, check_recipient};
use crate::store::{Collection, DiskStatus, MessageStore};
use crate::Message;

/// What to do with a composed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Send the message.
    Send,
    /// Throw the message away.
    Disregard,
    /// Keep the message on disk for later.
    Store,
}

impl Disposition {
    /// Parse a menu choice: `1` send, `2` disregard, `3` store.
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Send),
            "2" => Some(Self::Disregard),
            "3" => Some(Self::Store),
            _ => None,
        }
    }

    /// Collection the message is filed under.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        match self {
            Self::Send => Collection::Sent,
            Self::Disregard => Collection::Disregarded,
            Self::Store => Collection::Stored,
        }
    }

    /// Whether the message counts toward the session limit.
    #[must_use]
    pub const fn counts_toward_limit(&self) -> bool {
        matches!(self, Self::Send | Self::Store)
    }
}

/// Counters for one chat session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    next_sequence: u32,
    processed: u32,
    limit: u32,
}

impl Session {
    /// Start a session that ends after `limit` sent or stored messages.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            next_sequence: 0,
            processed: 0,
            limit,
        }
    }

    /// Sequence number the next composed message will get.
    #[must_use]
    pub const fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    /// Messages sent or stored so far.
    #[must_use]
    pub const fn processed(&self) -> u32 {
        self.processed
    }

    /// Session limit.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether the limit has been reached.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.processed >= self.limit
    }

    /// Validate input and build the next message.
    ///
    /// The sequence number only advances when a message is built.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure: recipient format, then length.
    pub fn compose(&mut self, recipient: &str, text: &str) -> Result<Message, ValidationError> {
        if !check_recipient(recipient) {
            return Err(ValidationError::InvalidRecipient);
        }
        check_message_length(text)?;

        let message = Message::new(recipient, text, self.next_sequence);
        self.next_sequence = self.next_sequence.saturating_add(1);
        debug!("Composed message {} ({})", message.id(), message.hash());
        Ok(message)
    }

    /// File `message` in the store and return the outcome for display.
    pub fn dispose(
        &mut self,
        store: &mut MessageStore,
        message: Message,
        disposition: Disposition,
        sender: &str,
    ) -> String {
        if disposition.counts_toward_limit() {
            self.processed = self.processed.saturating_add(1);
        }

        match disposition {
            Disposition::Send => {
                store.add_sent(message, sender);
                "Message successfully sent.".to_string()
            }
            Disposition::Disregard => {
                store.add_disregarded(message);
                "Message disregarded.".to_string()
            }
            Disposition::Store => match store.add_stored(message) {
                DiskStatus::Failed(e) => {
                    format!("Message stored for this session, but saving to disk failed: {e}")
                }
                DiskStatus::Synced | DiskStatus::Untouched => {
                    "Message successfully stored.".to_string()
                }
            },
        }
    }
}
