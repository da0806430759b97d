//! Store data models.

use crate::{Error, Message};

/// A sent message together with the display name of its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// The message.
    pub message: Message,
    /// Sender display name.
    pub sender: String,
}

/// The collection a message was filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Sent messages.
    Sent,
    /// Stored (archived to disk) messages.
    Stored,
    /// Disregarded messages.
    Disregarded,
}

impl Collection {
    /// Get display name for the collection.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Stored => "stored",
            Self::Disregarded => "disregarded",
        }
    }
}

/// Outcome of loading the archive when a store is opened.
///
/// Loading never fails the store; a broken archive is reported here and the
/// store starts with no stored messages.
#[derive(Debug)]
pub enum LoadStatus {
    /// Store has no archive attached.
    Detached,
    /// Archive file does not exist yet.
    NoFile,
    /// Archive was read successfully.
    Loaded {
        /// Number of messages restored.
        count: usize,
    },
    /// Archive could not be read or parsed.
    Recovered(Error),
}

impl LoadStatus {
    /// Returns true if the archive had to be discarded.
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Outcome of a write to the archive.
#[derive(Debug)]
pub enum DiskStatus {
    /// Archive file was updated.
    Synced,
    /// Operation did not touch the archive.
    Untouched,
    /// Archive write failed; the in-memory change still applies.
    Failed(Error),
}

impl DiskStatus {
    /// Returns true if the archive write failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A message removed from the store by hash.
#[derive(Debug)]
pub struct Removal {
    /// The removed message.
    pub message: Message,
    /// Collection it was removed from.
    pub collection: Collection,
    /// Sender name, for sent messages.
    pub sender: Option<String>,
    /// Archive outcome.
    pub disk: DiskStatus,
}
