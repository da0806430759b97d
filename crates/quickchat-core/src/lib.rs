//! # quickchat-core
//!
//! Core logic for the `QuickChat` console client.
//!
//! This crate provides:
//! - **Message records** - random 10-digit ids and derived content hashes
//! - **Message store** - sent / stored / disregarded collections with
//!   lookup, reporting and deletion
//! - **JSON archive** - on-disk mirror of stored messages
//! - Account validation and login
//! - Session context driving message composition and disposition

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod error;
pub mod message;
pub mod session;
pub mod store;

pub use account::{
    Login, User, ValidationError, ValidationResult, check_cell_number, check_message_length,
    check_password_complexity, check_recipient, check_username, validate_registration,
};
pub use error::{Error, Result};
pub use message::{Message, MessageHash, MessageId};
pub use session::{Disposition, Session};
pub use store::{
    ArchiveEntry, Collection, DiskStatus, JsonArchive, LoadStatus, MessageStore, Removal,
    SentMessage,
};
