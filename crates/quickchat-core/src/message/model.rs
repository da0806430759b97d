//! Message data models.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest generated id (first 10-digit number).
const ID_MIN: u64 = 1_000_000_000;

/// Largest generated id.
const ID_MAX: u64 = 9_999_999_999;

/// Ten-digit message identifier.
///
/// Ids are random and not checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a uniformly random 10-digit id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(ID_MIN..=ID_MAX).to_string())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First two characters, used as the hash prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        let end = self.0.char_indices().nth(2).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content hash of the form `<id prefix>:<sequence>:<FIRSTWORD><LASTWORD>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHash(String);

impl MessageHash {
    /// Derive the hash from an id, the session sequence number and the text.
    ///
    /// Words are the first and last whitespace-separated tokens of `text`,
    /// stripped to ASCII letters and digits and upper-cased. A single word
    /// appears twice; empty text yields an empty word part.
    #[must_use]
    pub fn derive(id: &MessageId, sequence: u32, text: &str) -> Self {
        let mut words = text.split_whitespace();
        let first = words.next().unwrap_or_default();
        let last = words.next_back().unwrap_or(first);

        Self(format!(
            "{}:{sequence}:{}{}",
            id.prefix(),
            hash_word(first),
            hash_word(last)
        ))
    }

    /// Get the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

impl std::fmt::Display for MessageHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn hash_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// A single chat message.
///
/// Immutable after construction: the hash is computed once from the id and
/// text available at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    recipient: String,
    text: String,
    hash: MessageHash,
    sent: bool,
}

impl Message {
    /// Creates a new message with a random id.
    ///
    /// `sequence` is the caller's running count of composed messages. No
    /// validation happens here.
    #[must_use]
    pub fn new(recipient: impl Into<String>, text: impl Into<String>, sequence: u32) -> Self {
        Self::with_rng(recipient, text, sequence, &mut rand::thread_rng())
    }

    /// Creates a new message drawing its id from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        recipient: impl Into<String>,
        text: impl Into<String>,
        sequence: u32,
        rng: &mut R,
    ) -> Self {
        let id = MessageId::generate(rng);
        let text = text.into();
        let hash = MessageHash::derive(&id, sequence, &text);

        Self {
            id,
            recipient: recipient.into(),
            text,
            hash,
            sent: false,
        }
    }

    /// Rebuilds a message from persisted fields without recomputing the hash.
    #[must_use]
    pub fn restore(
        id: MessageId,
        recipient: impl Into<String>,
        text: impl Into<String>,
        hash: MessageHash,
        sent: bool,
    ) -> Self {
        Self {
            id,
            recipient: recipient.into(),
            text: text.into(),
            hash,
            sent,
        }
    }

    /// Message id.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Recipient phone number.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Message body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content hash.
    #[must_use]
    pub const fn hash(&self) -> &MessageHash {
        &self.hash
    }

    /// Whether the message is flagged as sent. Always `false` for new messages.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        self.sent
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Four-line summary: id, hash, recipient, text.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Message ID: {}", self.id)?;
        writeln!(f, "Message Hash: {}", self.hash)?;
        writeln!(f, "Recipient: {}", self.recipient)?;
        write!(f, "Message: {}", self.text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hash_parts(hash: &MessageHash) -> (String, String, String) {
        let mut parts = hash.as_str().splitn(3, ':');
        (
            parts.next().unwrap().to_string(),
            parts.next().unwrap().to_string(),
            parts.next().unwrap().to_string(),
        )
    }

    #[test]
    fn test_new_message() {
        let msg = Message::new("+27831234567", "Hello World", 0);
        assert_eq!(msg.recipient(), "+27831234567");
        assert_eq!(msg.text(), "Hello World");
        assert!(!msg.is_sent());
        assert_eq!(msg.id().as_str().len(), 10);
    }

    #[test]
    fn test_hash_two_words() {
        let msg = Message::new("+27831234567", "Hello World", 0);
        let expected = format!("{}:0:HELLOWORLD", &msg.id().as_str()[..2]);
        assert_eq!(msg.hash().as_str(), expected);

        let msg = Message::new("+27831234567", "Hi there", 1);
        assert!(msg.hash().as_str().ends_with(":1:HITHERE"));
    }

    #[test]
    fn test_hash_uses_first_and_last_word() {
        let msg = Message::new("+27718693002", "Hi Mike, can you join us for dinner tonight", 0);
        assert!(msg.hash().as_str().ends_with(":0:HITONIGHT"));
    }

    #[test]
    fn test_hash_single_word_repeats() {
        let msg = Message::new("+27831234567", "Single", 2);
        assert!(msg.hash().as_str().ends_with(":2:SINGLESINGLE"));
    }

    #[test]
    fn test_hash_strips_punctuation() {
        let msg = Message::new("+27831234567", "Hello, World! Testing...", 3);
        let (_, seq, words) = hash_parts(msg.hash());
        assert_eq!(seq, "3");
        assert_eq!(words, "HELLOTESTING");
    }

    #[test]
    fn test_hash_empty_text() {
        let msg = Message::new("+27831234567", "", 4);
        assert!(msg.hash().as_str().ends_with(":4:"));
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let a = Message::with_rng("+1", "x", 0, &mut StdRng::seed_from_u64(7));
        let b = Message::with_rng("+1", "x", 0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_restore_keeps_hash() {
        let msg = Message::restore(
            MessageId::from("1234567890"),
            "+27831234567",
            "changed text",
            MessageHash::from("12:5:ORIGINALHASH".to_string()),
            false,
        );
        assert_eq!(msg.hash().as_str(), "12:5:ORIGINALHASH");
    }

    #[test]
    fn test_prefix_of_short_id() {
        assert_eq!(MessageId::from("7").prefix(), "7");
        assert_eq!(MessageId::from("").prefix(), "");
    }

    #[test]
    fn test_summary_lines() {
        let msg = Message::new("+27831234567", "Hello World", 0);
        let summary = msg.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("Message ID: {}", msg.id()));
        assert_eq!(lines[1], format!("Message Hash: {}", msg.hash()));
        assert_eq!(lines[2], "Recipient: +27831234567");
        assert_eq!(lines[3], "Message: Hello World");
    }

    proptest! {
        #[test]
        fn prop_id_is_ten_digits(seed in any::<u64>()) {
            let id = MessageId::generate(&mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(id.as_str().len(), 10);
            prop_assert!(id.as_str().bytes().all(|b| b.is_ascii_digit()));
            prop_assert_ne!(id.as_str().as_bytes()[0], b'0');
        }

        #[test]
        fn prop_hash_format(text in "\\PC{0,80}", sequence in 0u32..10_000) {
            let msg = Message::new("+27831234567", text, sequence);
            let (prefix, seq, words) = hash_parts(msg.hash());
            prop_assert_eq!(prefix.as_str(), &msg.id().as_str()[..2]);
            prop_assert_eq!(seq, sequence.to_string());
            prop_assert!(words.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }

        #[test]
        fn prop_hash_words(words in prop::collection::vec("[a-zA-Z0-9]{1,8}[,.!?]?", 1..8)) {
            let text = words.join(" ");
            let msg = Message::new("+27831234567", text, 0);
            let first = hash_word(&words[0]);
            let last = hash_word(&words[words.len() - 1]);
            let (_, _, token) = hash_parts(msg.hash());
            prop_assert_eq!(token, format!("{first}{last}"));
        }
    }
}
