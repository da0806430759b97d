//! Interactive console: registration, login, composing and the query menu.

use std::io::{self, BufRead, Write};

use quickchat_core::{
    Disposition, LoadStatus, Login, MessageStore, Session, User, ValidationError,
    check_cell_number, check_password_complexity, check_recipient, check_username,
};
use tracing::{debug, info};

/// Query menu shown once composing is finished.
const MENU: &str = "\n=== Message Store Operations ===
a) List sender & recipient of all Sent messages
b) Show longest Sent message
c) Search by Message ID
d) Find all messages for a Recipient
e) Delete by Message Hash
f) Print a Sent Report
x) Exit";

/// Prompt-driven session over any line reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console reading from `input` and writing to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the whole session. End of input finishes cleanly at any prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self, login: &mut Login, store: &mut MessageStore) -> io::Result<()> {
        self.say("Welcome to QuickChat")?;
        if store.load_status().is_recovered() {
            self.say("Stored message history could not be read and was skipped.")?;
        } else if let LoadStatus::Loaded { count } = store.load_status()
            && *count > 0
        {
            self.say(&format!("{count} stored message(s) loaded."))?;
        }

        if login.registered_user().is_none() && !self.register(login)? {
            return Ok(());
        }

        let Some(user) = self.log_in(login)? else {
            return Ok(());
        };

        let Some(limit) = self.read_limit()? else {
            return Ok(());
        };

        let mut session = Session::new(limit);
        self.compose_loop(&mut session, store, &user.full_name())?;

        self.say(&format!("\nTotal messages sent: {}", store.sent_count()))?;
        self.query_menu(store)
    }

    /// Write one line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("End of input at prompt {:?}", label.trim());
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Capture a new user field by field, stopping at the first invalid one.
    fn register(&mut self, login: &mut Login) -> io::Result<bool> {
        self.say("=== User Registration ===")?;

        let Some(first_name) = self.prompt("Enter your first name: ")? else {
            return Ok(false);
        };
        let Some(last_name) = self.prompt("Enter your last name: ")? else {
            return Ok(false);
        };

        let Some(username) =
            self.prompt("Enter username (must contain _ and be no more than 5 characters): ")?
        else {
            return Ok(false);
        };
        if !check_username(&username) {
            return self.reject_registration(&ValidationError::InvalidUsername);
        }
        self.say("Username successfully captured.")?;

        let Some(password) =
            self.prompt("Enter password (8+ characters, with a capital, a number and a special character): ")?
        else {
            return Ok(false);
        };
        if !check_password_complexity(&password) {
            return self.reject_registration(&ValidationError::WeakPassword);
        }
        self.say("Password successfully captured.")?;

        let Some(cell_number) =
            self.prompt("Enter cell phone number (with international code, e.g. +27831234567): ")?
        else {
            return Ok(false);
        };
        if !check_cell_number(&cell_number) {
            return self.reject_registration(&ValidationError::InvalidCellNumber);
        }
        self.say("Cell number successfully captured.")?;

        let user = User::new(first_name, last_name, username, password, cell_number);
        match login.register(user) {
            Ok(()) => {
                self.say("Registration successful!")?;
                Ok(true)
            }
            Err(errors) => match errors.first() {
                Some(error) => self.reject_registration(error),
                None => Ok(false),
            },
        }
    }

    fn reject_registration(&mut self, error: &ValidationError) -> io::Result<bool> {
        self.say(&error.message())?;
        self.say("Registration failed. Exiting application.")?;
        Ok(false)
    }

    fn log_in(&mut self, login: &Login) -> io::Result<Option<User>> {
        self.say("\n=== User Login ===")?;
        let Some(username) = self.prompt("Enter username: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(None);
        };

        let user = login.authenticate(&username, &password).cloned();
        self.say(&Login::status_message(user.as_ref()))?;
        match user {
            Some(user) => {
                info!("User {} logged in", user.username);
                Ok(Some(user))
            }
            None => {
                self.say("Login failed. Exiting application.")?;
                Ok(None)
            }
        }
    }

    fn read_limit(&mut self) -> io::Result<Option<u32>> {
        loop {
            let Some(answer) = self.prompt("\nHow many messages do you want to enter? ")? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(limit) => return Ok(Some(limit)),
                Err(_) => self.say("Please enter a whole number.")?,
            }
        }
    }

    fn compose_loop(
        &mut self,
        session: &mut Session,
        store: &mut MessageStore,
        sender: &str,
    ) -> io::Result<()> {
        while !session.is_complete() {
            let Some(recipient) =
                self.prompt("\nEnter recipient (+ followed by 10 digits, e.g. +2783884567): ")?
            else {
                return Ok(());
            };
            if !check_recipient(&recipient) {
                self.say(&ValidationError::InvalidRecipient.message())?;
                continue;
            }

            let Some(text) = self.prompt("Enter message (no more than 250 characters): ")? else {
                return Ok(());
            };
            let message = match session.compose(&recipient, &text) {
                Ok(message) => message,
                Err(error) => {
                    self.say(&error.message())?;
                    continue;
                }
            };

            self.say(&message.summary())?;
            self.say("\nChoose what to do with this message:")?;
            self.say("1. Send Message")?;
            self.say("2. Disregard Message")?;
            self.say("3. Store Message")?;
            let Some(choice) = self.prompt("Enter your choice (1-3): ")? else {
                return Ok(());
            };

            let outcome = match Disposition::from_choice(&choice) {
                Some(Disposition::Disregard) => {
                    let Some(confirm) = self.prompt("Press 0 to delete message: ")? else {
                        return Ok(());
                    };
                    if confirm == "0" {
                        session.dispose(store, message, Disposition::Disregard, sender)
                    } else {
                        "Message kept.".to_string()
                    }
                }
                Some(disposition) => session.dispose(store, message, disposition, sender),
                None => "Invalid choice. Message disregarded.".to_string(),
            };
            self.say(&outcome)?;
        }
        Ok(())
    }

    fn query_menu(&mut self, store: &mut MessageStore) -> io::Result<()> {
        loop {
            self.say(MENU)?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            let report = match choice.to_lowercase().as_str() {
                "a" => store.list_senders_and_recipients(),
                "b" => store.show_longest_sent(),
                "c" => match self.prompt("Enter 10-digit Message ID: ")? {
                    Some(id) => store.find_by_id(&id),
                    None => return Ok(()),
                },
                "d" => match self.prompt("Enter recipient number (e.g. +2783884567): ")? {
                    Some(recipient) => store.find_by_recipient(&recipient),
                    None => return Ok(()),
                },
                "e" => match self.prompt("Enter Message Hash (e.g. 00:3:HITONIGHT): ")? {
                    Some(hash) => store.delete_by_hash(&hash),
                    None => return Ok(()),
                },
                "f" => store.print_sent_report(),
                "x" => return Ok(()),
                _ => "Invalid option. Please try again.".to_string(),
            };
            self.say(&format!("\n{report}"))?;
        }
    }
}
