//! Session message store.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::archive::{ArchiveEntry, JsonArchive};
use super::model::{Collection, DiskStatus, LoadStatus, Removal, SentMessage};
use crate::{Message, MessageId};

/// Returned by sent-message reports when nothing has been sent.
pub const NO_SENT_MESSAGES: &str = "No sent messages yet.";

/// Returned by [`MessageStore::find_by_id`] when no message matches.
pub const ID_NOT_FOUND: &str = "Message ID not found.";

/// Returned by [`MessageStore::delete_by_hash`] when no message matches.
pub const HASH_NOT_FOUND: &str = "Message hash not found.";

/// Sent, stored and disregarded messages for one session.
///
/// Collections keep insertion order. Nothing stops the same message from
/// being filed in more than one collection, and ids and hashes are not
/// checked for uniqueness; lookups return the first match.
#[derive(Debug)]
pub struct MessageStore {
    sent: Vec<SentMessage>,
    stored: Vec<Message>,
    disregarded: Vec<Message>,
    archive: Option<JsonArchive>,
    load_status: LoadStatus,
    /// Placeholder ids given to messages loaded from entries without an id.
    legacy_ids: HashSet<MessageId>,
}

impl MessageStore {
    /// Open a store backed by the archive at `path`.
    ///
    /// Previously archived messages are loaded into the stored collection.
    /// A missing archive starts empty; an unreadable or malformed one is
    /// logged, reported through [`load_status`](Self::load_status) and
    /// otherwise ignored.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let archive = JsonArchive::new(path);

        let mut legacy_ids = HashSet::new();
        let (stored, load_status) = match archive.load() {
            Ok(Some(entries)) => {
                let stored: Vec<Message> = entries
                    .into_iter()
                    .map(|entry| {
                        let legacy = entry.is_legacy();
                        let message = ArchiveEntry::into_message(entry);
                        if legacy {
                            legacy_ids.insert(message.id().clone());
                        }
                        message
                    })
                    .collect();
                info!(
                    "Loaded {} stored messages from {:?}",
                    stored.len(),
                    archive.path()
                );
                let count = stored.len();
                (stored, LoadStatus::Loaded { count })
            }
            Ok(None) => {
                debug!("No message archive at {:?}", archive.path());
                (Vec::new(), LoadStatus::NoFile)
            }
            Err(e) => {
                warn!("Error loading stored messages, starting empty: {}", e);
                (Vec::new(), LoadStatus::Recovered(e))
            }
        };

        Self {
            sent: Vec::new(),
            stored,
            disregarded: Vec::new(),
            archive: Some(archive),
            load_status,
            legacy_ids,
        }
    }

    /// Create a store with no archive, for testing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sent: Vec::new(),
            stored: Vec::new(),
            disregarded: Vec::new(),
            archive: None,
            load_status: LoadStatus::Detached,
            legacy_ids: HashSet::new(),
        }
    }

    /// Outcome of loading the archive when the store was opened.
    #[must_use]
    pub const fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Archive file location, if the store has one.
    #[must_use]
    pub fn archive_path(&self) -> Option<&Path> {
        self.archive.as_ref().map(JsonArchive::path)
    }

    /// File a message as sent by `sender`.
    pub fn add_sent(&mut self, message: Message, sender: impl Into<String>) {
        let sender = sender.into();
        debug!("Message {} sent by {}", message.id(), sender);
        self.sent.push(SentMessage { message, sender });
    }

    /// File a message as stored and append it to the archive.
    ///
    /// The message is kept in memory even if the archive write fails.
    pub fn add_stored(&mut self, message: Message) -> DiskStatus {
        let disk = match &self.archive {
            Some(archive) => match archive.append(&message) {
                Ok(()) => DiskStatus::Synced,
                Err(e) => {
                    warn!("Error storing message {}: {}", message.id(), e);
                    DiskStatus::Failed(e)
                }
            },
            None => DiskStatus::Untouched,
        };

        debug!("Message {} stored", message.id());
        self.stored.push(message);
        disk
    }

    /// File a message as disregarded. Not persisted.
    pub fn add_disregarded(&mut self, message: Message) {
        debug!("Message {} disregarded", message.id());
        self.disregarded.push(message);
    }

    /// Sent messages in insertion order.
    #[must_use]
    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    /// Stored messages: archived ones first, then this session's.
    #[must_use]
    pub fn stored(&self) -> &[Message] {
        &self.stored
    }

    /// Disregarded messages in insertion order.
    #[must_use]
    pub fn disregarded(&self) -> &[Message] {
        &self.disregarded
    }

    /// Number of sent messages.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// The sent message with the longest text; the earliest wins ties.
    #[must_use]
    pub fn longest_sent(&self) -> Option<&SentMessage> {
        self.sent.iter().reduce(|longest, entry| {
            if entry.message.text_len() > longest.message.text_len() {
                entry
            } else {
                longest
            }
        })
    }

    /// First message with the given id, searching sent then stored.
    #[must_use]
    pub fn lookup_id(&self, id: &str) -> Option<&Message> {
        self.sent_and_stored().find(|m| m.id().as_str() == id)
    }

    /// All messages for a recipient, sent ones first, then stored.
    #[must_use]
    pub fn messages_for_recipient(&self, recipient: &str) -> Vec<&Message> {
        self.sent_and_stored()
            .filter(|m| m.recipient() == recipient)
            .collect()
    }

    /// Remove the first message with the given hash.
    ///
    /// Sent messages are searched first and removed from memory only. A
    /// stored match is also removed from the archive; the in-memory removal
    /// stands even if that rewrite fails.
    pub fn remove_by_hash(&mut self, hash: &str) -> Option<Removal> {
        if let Some(pos) = self
            .sent
            .iter()
            .position(|entry| entry.message.hash().as_str() == hash)
        {
            let SentMessage { message, sender } = self.sent.remove(pos);
            info!("Deleted sent message {}", message.id());
            return Some(Removal {
                message,
                collection: Collection::Sent,
                sender: Some(sender),
                disk: DiskStatus::Untouched,
            });
        }

        let pos = self
            .stored
            .iter()
            .position(|m| m.hash().as_str() == hash)?;
        let message = self.stored.remove(pos);
        let legacy = self.legacy_ids.remove(message.id());

        let disk = match &self.archive {
            Some(archive) => match archive.remove(&message, legacy) {
                Ok(_) => DiskStatus::Synced,
                Err(e) => {
                    warn!("Error removing message {} from archive: {}", message.id(), e);
                    DiskStatus::Failed(e)
                }
            },
            None => DiskStatus::Untouched,
        };

        info!("Deleted stored message {}", message.id());
        Some(Removal {
            message,
            collection: Collection::Stored,
            sender: None,
            disk,
        })
    }

    /// Sender and recipient of every sent message.
    #[must_use]
    pub fn list_senders_and_recipients(&self) -> String {
        if self.sent.is_empty() {
            return NO_SENT_MESSAGES.to_string();
        }

        let mut report = String::new();
        for entry in &self.sent {
            let _ = write!(
                report,
                "Sender: {}\nRecipient: {}\n---\n",
                entry.sender,
                entry.message.recipient()
            );
        }
        report
    }

    /// Text of the longest sent message.
    #[must_use]
    pub fn show_longest_sent(&self) -> String {
        self.longest_sent().map_or_else(
            || NO_SENT_MESSAGES.to_string(),
            |entry| format!("Longest Message: {}", entry.message.text()),
        )
    }

    /// Recipient and text of the first message with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> String {
        self.lookup_id(id).map_or_else(
            || ID_NOT_FOUND.to_string(),
            |m| format!("Recipient: {}\nMessage: {}", m.recipient(), m.text()),
        )
    }

    /// Text and id of every message for a recipient.
    #[must_use]
    pub fn find_by_recipient(&self, recipient: &str) -> String {
        let matches = self.messages_for_recipient(recipient);
        if matches.is_empty() {
            return format!("No messages found for recipient: {recipient}");
        }

        let mut report = String::new();
        for m in matches {
            let _ = write!(report, "Message: {}\nMessage ID: {}\n---\n", m.text(), m.id());
        }
        report
    }

    /// Delete the first message with the given hash.
    pub fn delete_by_hash(&mut self, hash: &str) -> String {
        self.remove_by_hash(hash).map_or_else(
            || HASH_NOT_FOUND.to_string(),
            |removal| format!("Message \"{}\" successfully deleted.", removal.message.text()),
        )
    }

    /// Hash, recipient and text of every sent message.
    #[must_use]
    pub fn print_sent_report(&self) -> String {
        if self.sent.is_empty() {
            return NO_SENT_MESSAGES.to_string();
        }

        let mut report = String::new();
        for entry in &self.sent {
            let m = &entry.message;
            let _ = write!(
                report,
                "Message Hash: {}\nRecipient: {}\nMessage: {}\n---\n",
                m.hash(),
                m.recipient(),
                m.text()
            );
        }
        report
    }

    fn sent_and_stored(&self) -> impl Iterator<Item = &Message> {
        self.sent
            .iter()
            .map(|entry| &entry.message)
            .chain(self.stored.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MessageId;

    struct Fixture {
        store: MessageStore,
        first: Message,
        second: Message,
        third: Message,
    }

    fn fixture() -> Fixture {
        Fixture {
            store: MessageStore::in_memory(),
            first: Message::new("+27831234567", "First test message", 0),
            second: Message::new("+27831234568", "Second test message that is longer", 1),
            third: Message::new("+27831234567", "Third message for same recipient", 2),
        }
    }

    #[test]
    fn test_add_to_each_collection() {
        let Fixture {
            mut store,
            first,
            second,
            third,
        } = fixture();

        store.add_sent(first, "John Doe");
        assert!(matches!(store.add_stored(second), DiskStatus::Untouched));
        store.add_disregarded(third);

        assert_eq!(store.sent().len(), 1);
        assert_eq!(store.stored().len(), 1);
        assert_eq!(store.disregarded().len(), 1);
        assert_eq!(store.sent()[0].sender, "John Doe");
    }

    #[test]
    fn test_list_senders_and_recipients() {
        let Fixture {
            mut store,
            first,
            second,
            ..
        } = fixture();
        store.add_sent(first, "John Doe");
        store.add_sent(second, "Jane Smith");

        let result = store.list_senders_and_recipients();
        assert!(result.contains("Sender: John Doe"));
        assert!(result.contains("Recipient: +27831234567"));
        assert!(result.contains("Sender: Jane Smith"));
        assert!(result.contains("Recipient: +27831234568"));
        assert!(result.find("John Doe").unwrap() < result.find("Jane Smith").unwrap());
    }

    #[test]
    fn test_empty_sent_reports() {
        let store = MessageStore::in_memory();
        assert_eq!(store.list_senders_and_recipients(), "No sent messages yet.");
        assert_eq!(store.show_longest_sent(), "No sent messages yet.");
        assert_eq!(store.print_sent_report(), "No sent messages yet.");
    }

    #[test]
    fn test_show_longest_sent() {
        let Fixture {
            mut store,
            first,
            second,
            ..
        } = fixture();
        store.add_sent(first, "John Doe");
        store.add_sent(second, "Jane Smith");

        assert_eq!(
            store.show_longest_sent(),
            "Longest Message: Second test message that is longer"
        );
    }

    #[test]
    fn test_longest_sent_keeps_earliest_on_tie() {
        let mut store = MessageStore::in_memory();
        let a = Message::new("+27830000001", "same len a", 0);
        let b = Message::new("+27830000002", "same len b", 1);
        let a_id = a.id().clone();
        store.add_sent(a, "A");
        store.add_sent(b, "B");

        assert_eq!(store.longest_sent().unwrap().message.id(), &a_id);
    }

    #[test]
    fn test_find_by_id() {
        let Fixture {
            mut store,
            first,
            second,
            ..
        } = fixture();
        let id = first.id().to_string();
        let stored_id = second.id().to_string();
        store.add_sent(first, "John Doe");
        store.add_stored(second);

        let result = store.find_by_id(&id);
        assert!(result.contains("Recipient: +27831234567"));
        assert!(result.contains("Message: First test message"));

        let result = store.find_by_id(&stored_id);
        assert!(result.contains("Message: Second test message that is longer"));
    }

    #[test]
    fn test_find_by_id_prefers_sent() {
        let mut store = MessageStore::in_memory();
        let sent = Message::new("+27830000001", "sent copy", 0);
        let stored = Message::restore(
            sent.id().clone(),
            "+27830000002",
            "stored copy",
            sent.hash().clone(),
            false,
        );
        let id = sent.id().to_string();
        store.add_stored(stored);
        store.add_sent(sent, "A");

        assert!(store.find_by_id(&id).contains("sent copy"));
    }

    #[test]
    fn test_find_by_id_not_found() {
        let store = MessageStore::in_memory();
        assert_eq!(store.find_by_id("9999999999"), "Message ID not found.");
    }

    #[test]
    fn test_find_by_recipient() {
        let Fixture {
            mut store,
            first,
            second,
            third,
        } = fixture();
        store.add_sent(first, "John Doe");
        store.add_sent(second, "Jane Smith");
        store.add_stored(third);

        let result = store.find_by_recipient("+27831234567");
        assert!(result.contains("First test message"));
        assert!(result.contains("Third message for same recipient"));
        assert!(!result.contains("Second test message"));
    }

    #[test]
    fn test_find_by_recipient_not_found() {
        let store = MessageStore::in_memory();
        assert_eq!(
            store.find_by_recipient("+27830000000"),
            "No messages found for recipient: +27830000000"
        );
    }

    #[test]
    fn test_delete_sent_by_hash() {
        let Fixture {
            mut store,
            first,
            second,
            ..
        } = fixture();
        let hash = first.hash().to_string();
        store.add_sent(first, "John Doe");
        store.add_stored(second);

        let result = store.delete_by_hash(&hash);
        assert_eq!(result, "Message \"First test message\" successfully deleted.");
        assert!(store.sent().is_empty());
        assert_eq!(store.stored().len(), 1);
    }

    #[test]
    fn test_remove_stored_by_hash() {
        let Fixture {
            mut store, second, ..
        } = fixture();
        let hash = second.hash().to_string();
        store.add_stored(second);

        let removal = store.remove_by_hash(&hash).unwrap();
        assert_eq!(removal.collection, Collection::Stored);
        assert!(removal.sender.is_none());
        assert!(store.stored().is_empty());
    }

    #[test]
    fn test_delete_removes_only_first_match() {
        let mut store = MessageStore::in_memory();
        let a = Message::new("+27830000001", "first copy", 0);
        let b = Message::restore(
            MessageId::from("5555555555"),
            "+27830000001",
            "second copy",
            a.hash().clone(),
            false,
        );
        let hash = a.hash().to_string();
        store.add_sent(a, "A");
        store.add_sent(b, "B");

        assert!(store.delete_by_hash(&hash).contains("first copy"));
        assert_eq!(store.sent().len(), 1);
        assert_eq!(store.sent()[0].sender, "B");
    }

    #[test]
    fn test_delete_by_hash_not_found() {
        let Fixture {
            mut store, first, ..
        } = fixture();
        store.add_sent(first, "John Doe");

        assert_eq!(store.delete_by_hash("00:999:NOTFOUND"), "Message hash not found.");
        assert_eq!(store.sent().len(), 1);
    }

    #[test]
    fn test_print_sent_report() {
        let Fixture {
            mut store,
            first,
            second,
            ..
        } = fixture();
        let first_hash = first.hash().to_string();
        let second_hash = second.hash().to_string();
        store.add_sent(first, "John Doe");
        store.add_sent(second, "Jane Smith");

        let result = store.print_sent_report();
        assert!(result.contains(&format!("Message Hash: {first_hash}")));
        assert!(result.contains("Recipient: +27831234567"));
        assert!(result.contains("Message: First test message"));
        assert!(result.contains(&format!("Message Hash: {second_hash}")));
        assert!(result.contains("Recipient: +27831234568"));
        assert!(result.contains("Message: Second test message that is longer"));
    }
}
