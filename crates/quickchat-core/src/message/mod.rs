//! Message records.
//!
//! A message carries a random 10-digit id, the recipient, the text and a
//! content hash derived once at construction.

mod model;

pub use model::{Message, MessageHash, MessageId};
