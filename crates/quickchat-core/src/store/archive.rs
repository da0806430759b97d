//! JSON archive of stored messages.
//!
//! The archive is a single pretty-printed JSON array. Every write rewrites
//! the whole file through a temporary sibling that is renamed into place.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Message, MessageHash, MessageId, Result};

/// Timestamp layout written to the archive.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One archived message as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Message id. Missing in archives written by older versions.
    #[serde(rename = "messageID", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Recipient phone number.
    pub recipient: String,
    /// Message body.
    pub message_text: String,
    /// Content hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_hash: Option<String>,
    /// Sent flag.
    #[serde(default)]
    pub is_sent: bool,
    /// Local time the entry was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Fields this version does not know about, kept on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ArchiveEntry {
    /// Creates an entry for `message` stamped with the current local time.
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        Self {
            message_id: Some(message.id().to_string()),
            recipient: message.recipient().to_string(),
            message_text: message.text().to_string(),
            message_hash: Some(message.hash().to_string()),
            is_sent: message.is_sent(),
            timestamp: Some(Local::now().format(TIMESTAMP_FORMAT).to_string()),
            extra: serde_json::Map::new(),
        }
    }

    /// Rebuilds the message.
    ///
    /// Persisted id and hash are kept as-is. Entries without an id get a fresh
    /// one, and a missing hash is derived with sequence number 0 since the
    /// original sequence number is not archived.
    #[must_use]
    pub fn into_message(self) -> Message {
        match (self.message_id, self.message_hash) {
            (Some(id), Some(hash)) => Message::restore(
                MessageId::from(id),
                self.recipient,
                self.message_text,
                MessageHash::from(hash),
                self.is_sent,
            ),
            (Some(id), None) => {
                let id = MessageId::from(id);
                let hash = MessageHash::derive(&id, 0, &self.message_text);
                Message::restore(id, self.recipient, self.message_text, hash, self.is_sent)
            }
            (None, _) => Message::new(self.recipient, self.message_text, 0),
        }
    }

    /// Whether this entry was written without an id.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        self.message_id.is_none()
    }

    /// Whether this entry is the archived copy of `message`.
    ///
    /// Messages loaded from an entry without an id (`legacy`) carry a
    /// placeholder id, so they match id-less entries on recipient and text.
    /// Every other message matches on id only.
    #[must_use]
    pub fn matches(&self, message: &Message, legacy: bool) -> bool {
        match self.message_id.as_deref() {
            Some(id) => !legacy && id == message.id().as_str(),
            None => {
                legacy
                    && self.recipient == message.recipient()
                    && self.message_text == message.text()
            }
        }
    }
}

/// File-backed archive of stored messages.
#[derive(Debug, Clone)]
pub struct JsonArchive {
    path: PathBuf,
}

impl JsonArchive {
    /// Create an archive handle for the given file. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Archive file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries.
    ///
    /// Returns `None` if the file does not exist. A file holding only
    /// whitespace reads as an empty archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// message objects.
    pub fn load(&self) -> Result<Option<Vec<ArchiveEntry>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        let entries = serde_json::from_str(&contents).map_err(|e| Error::MalformedArchive {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(entries))
    }

    /// Append one message to the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing archive cannot be read or parsed, or
    /// the rewrite fails. A malformed archive is left untouched.
    pub fn append(&self, message: &Message) -> Result<()> {
        let mut entries = self.load()?.unwrap_or_default();
        entries.push(ArchiveEntry::from_message(message));
        self.write_all(&entries)?;

        debug!("Archived message {} to {:?}", message.id(), self.path);
        Ok(())
    }

    /// Remove the archived copy of `message`.
    ///
    /// Every entry carrying the message id is removed. A `legacy` message
    /// was loaded from an entry without an id and removes the first id-less
    /// entry with the same recipient and text instead.
    ///
    /// Returns the number of entries removed. A missing archive removes
    /// nothing and is not rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read, parsed or rewritten.
    pub fn remove(&self, message: &Message, legacy: bool) -> Result<usize> {
        let Some(mut entries) = self.load()? else {
            return Ok(0);
        };

        let before = entries.len();
        if legacy {
            if let Some(pos) = entries.iter().position(|entry| entry.matches(message, true)) {
                entries.remove(pos);
            }
        } else {
            entries.retain(|entry| !entry.matches(message, false));
        }
        let removed = before - entries.len();

        self.write_all(&entries)?;
        debug!("Removed {} archived entries for message {}", removed, message.id());
        Ok(removed)
    }

    /// Replace the archive contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn write_all(&self, entries: &[ArchiveEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries.serialize(&mut serializer)?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, &buf)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
