//! Desktop notifications.

use notify_rust::Notification;
use tracing::{debug, warn};

/// Show the welcome notification. Failures are logged and otherwise ignored.
pub fn show_welcome() {
    match Notification::new()
        .appname("quickchat")
        .summary("QuickChat")
        .body("Welcome to QuickChat")
        .show()
    {
        Ok(_) => debug!("Welcome notification shown"),
        Err(e) => warn!("Desktop notification unavailable: {}", e),
    }
}
