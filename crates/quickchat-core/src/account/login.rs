//! Registration and login for the single session user.

use tracing::{debug, info};

use super::model::User;
use super::validation::{ValidationResult, validate_registration};

/// Holds the one registered user and checks credentials against it.
#[derive(Debug, Clone, Default)]
pub struct Login {
    user: Option<User>,
}

impl Login {
    /// Create a login with no registered user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user` if all fields validate.
    ///
    /// A successful registration replaces any previous user.
    ///
    /// # Errors
    ///
    /// Returns every validation error; the previous user is kept.
    pub fn register(&mut self, user: User) -> ValidationResult {
        validate_registration(&user)?;
        info!("Registered user {}", user.username);
        self.user = Some(user);
        Ok(())
    }

    /// The registered user, if any.
    #[must_use]
    pub const fn registered_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Check credentials, returning the user on an exact match.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        let user = self
            .user
            .as_ref()
            .filter(|u| u.username == username && u.password == password);
        if user.is_none() {
            debug!("Login failed for {}", username);
        }
        user
    }

    /// Greeting for a successful login, or the failure notice.
    #[must_use]
    pub fn status_message(user: Option<&User>) -> String {
        user.map_or_else(
            || "Username or password incorrect, please try again.".to_string(),
            |u| {
                format!(
                    "Welcome {}, {} it is great to see you again.",
                    u.first_name, u.last_name
                )
            },
        )
    }
}
