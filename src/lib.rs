//! Slash-command dispatch and deep-link resolution for a chat client.
//!
//! The [`Dispatcher`] sends slash commands to the server or to an installed
//! app, and opens links inside the app when they point at a known server.
pub mod app;
pub mod apps;
pub mod client;
pub mod command;
pub mod config;
pub mod deep_link;
pub mod dispatcher;
pub mod error;
pub mod i18n;
pub mod integrations;
pub mod logging;
pub mod outcome;
pub mod server_url;
pub mod storage;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;

pub use command::CommandOutcome;
pub use deep_link::LinkOutcome;
pub use dispatcher::{Dispatcher, Services};
pub use error::DispatchError;
pub use outcome::Outcome;
