//! Message store.
//!
//! Holds the sent, stored and disregarded collections for a session and
//! mirrors stored messages to a JSON archive on disk.

mod archive;
mod model;
mod repository;

pub use archive::{ArchiveEntry, JsonArchive};
pub use model::{Collection, DiskStatus, LoadStatus, Removal, SentMessage};
pub use repository::{HASH_NOT_FOUND, ID_NOT_FOUND, MessageStore, NO_SENT_MESSAGES};
