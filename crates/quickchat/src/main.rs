//! `QuickChat` - console messaging client
//!
//! Register, log in, then compose messages and send, store or disregard
//! each one. Stored messages are kept in a JSON archive between runs.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod console;
mod notify;
mod settings;

use std::io;

use quickchat_core::{Login, MessageStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use console::Console;
use settings::AppSettings;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with prompts on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickchat=warn,quickchat_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting QuickChat");

    let settings = settings::load_settings().unwrap_or_else(|e| {
        warn!("Failed to load settings, using defaults: {:#}", e);
        AppSettings::default()
    });

    if settings.welcome_notification {
        notify::show_welcome();
    }

    let store_path = settings.store_path();
    info!("Using message archive {:?}", store_path);
    let mut store = MessageStore::open(store_path);

    let mut login = Login::new();
    if let Some(user) = settings.user
        && let Err(errors) = login.register(user)
    {
        warn!("Ignoring pre-registered user from settings: {:?}", errors);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(stdin.lock(), stdout.lock()).run(&mut login, &mut store)?;

    info!("QuickChat finished");
    Ok(())
}
