//! Account module.
//!
//! Provides the user model, field validation and login.

mod login;
mod model;
mod validation;

pub use login::Login;
pub use model::User;
pub use validation::{
    MAX_MESSAGE_LENGTH, ValidationError, ValidationResult, check_cell_number,
    check_message_length, check_password_complexity, check_recipient, check_username,
    validate_registration,
};
