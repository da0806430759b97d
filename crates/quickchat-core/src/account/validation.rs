//! Account and message field validation.

use super::model::User;

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 250;

/// Validation error for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username lacks an underscore or is longer than five characters.
    InvalidUsername,
    /// Password does not meet complexity rules.
    WeakPassword,
    /// Cell number is not `+` followed by country code and number.
    InvalidCellNumber,
    /// Recipient is not `+` followed by exactly ten digits.
    InvalidRecipient,
    /// Message is longer than [`MAX_MESSAGE_LENGTH`].
    MessageTooLong {
        /// Characters over the limit.
        excess: usize,
    },
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidUsername => "Username is not correctly formatted, please ensure that \
                your username contains an underscore and is no more than five characters in length."
                .to_string(),
            Self::WeakPassword => "Password is not correctly formatted, please ensure that the \
                password contains at least eight characters, a capital letter, a number, and a \
                special character."
                .to_string(),
            Self::InvalidCellNumber => "Cell phone number incorrectly formatted or does not \
                contain international code."
                .to_string(),
            Self::InvalidRecipient => "Cell phone number is incorrectly formatted or does not \
                contain an international code, please correct the number and try again."
                .to_string(),
            Self::MessageTooLong { excess } => {
                format!("Message exceeds {MAX_MESSAGE_LENGTH} characters by {excess}, please reduce size.")
            }
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "username",
            Self::WeakPassword => "password",
            Self::InvalidCellNumber => "cell_number",
            Self::InvalidRecipient => "recipient",
            Self::MessageTooLong { .. } => "message",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a registration.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Username must contain an underscore and be at most five characters.
#[must_use]
pub fn check_username(username: &str) -> bool {
    username.contains('_') && username.chars().count() <= 5
}

/// Password must be at least eight characters with a capital letter, a digit
/// and a special character.
#[must_use]
pub fn check_password_complexity(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Cell number must be `+`, a 1-3 digit country code and a 7-10 digit number.
#[must_use]
pub fn check_cell_number(cell_number: &str) -> bool {
    plus_digits(cell_number).is_some_and(|n| (8..=13).contains(&n))
}

/// Message recipients must be `+` followed by exactly ten digits.
#[must_use]
pub fn check_recipient(recipient: &str) -> bool {
    plus_digits(recipient) == Some(10)
}

/// Check a message body against [`MAX_MESSAGE_LENGTH`].
///
/// # Errors
///
/// Returns [`ValidationError::MessageTooLong`] with the excess character count.
pub fn check_message_length(text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > MAX_MESSAGE_LENGTH {
        Err(ValidationError::MessageTooLong {
            excess: len - MAX_MESSAGE_LENGTH,
        })
    } else {
        Ok(())
    }
}

/// Validate the fields of a user registration.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_registration(user: &User) -> ValidationResult {
    let mut errors = Vec::new();

    if !check_username(&user.username) {
        errors.push(ValidationError::InvalidUsername);
    }
    if !check_password_complexity(&user.password) {
        errors.push(ValidationError::WeakPassword);
    }
    if !check_cell_number(&user.cell_number) {
        errors.push(ValidationError::InvalidCellNumber);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Number of digits after a leading `+`, if the rest is all ASCII digits.
fn plus_digits(number: &str) -> Option<usize> {
    let digits = number.strip_prefix('+')?;
    digits
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some(digits.len())
}
