//! Account model types.

use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Cell phone number with international code.
    pub cell_number: String,
}

impl User {
    /// Create a user from its fields.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        cell_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            password: password.into(),
            cell_number: cell_number.into(),
        }
    }

    /// First and last name separated by a space, used as the sender name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
