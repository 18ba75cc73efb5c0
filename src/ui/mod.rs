//! The navigation/presentation seam and the console front end.
pub mod navigator;
pub mod runner;

pub use navigator::EventNavigator;
pub use runner::{run_console, ConsoleState};

use anyhow::Result;
use async_trait::async_trait;

use crate::apps::types::{AppContext, AppForm};

/// Something the user should see, produced by navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum UIEvent {
    ChannelOpened {
        server_url: String,
        channel_id: String,
        channel_name: Option<String>,
    },
    PermalinkShown {
        server_url: String,
        team_name: String,
        post_id: String,
    },
    DirectChannelOpened {
        server_url: String,
        user_id: String,
        display_name: String,
        from_search: bool,
    },
    AppFormShown {
        form: AppForm,
        context: AppContext,
    },
    PluginScreenShown {
        plugin_id: String,
        link: String,
    },
    ExternalUrlOpened(String),
    Alert {
        title: String,
        message: String,
    },
    ChatMessage(String),
}

/// Navigation and presentation actions triggered by commands and links.
///
/// Callers treat every action as fire-and-forget; errors only decide whether
/// an alert is shown.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn switch_to_channel_by_name(
        &self,
        server_url: &str,
        channel_name: &str,
        team_name: &str,
    ) -> Result<()>;

    async fn switch_to_channel_by_id(&self, server_url: &str, channel_id: &str) -> Result<()>;

    async fn show_permalink(&self, server_url: &str, team_name: &str, post_id: &str)
        -> Result<()>;

    /// Opens (creating if needed) the direct channel with `user_id`.
    async fn make_direct_channel(
        &self,
        server_url: &str,
        user_id: &str,
        display_name: &str,
        from_search: bool,
    ) -> Result<()>;

    fn show_app_form(&self, form: &AppForm, context: &AppContext);

    fn show_plugin_screen(&self, plugin_id: &str, link: &str);

    async fn open_external_url(&self, url: &str) -> Result<()>;

    fn alert(&self, title: &str, message: &str);
}
