//! A `Navigator` that reports every action as a `UIEvent`.
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

use crate::apps::types::{AppContext, AppForm};
use crate::storage::DatabaseRegistry;

use super::{Navigator, UIEvent};

/// Resolves navigation targets against the local databases and emits the
/// result to whoever renders the UI.
#[derive(Clone)]
pub struct EventNavigator {
    databases: Arc<dyn DatabaseRegistry>,
    ui_sender: mpsc::UnboundedSender<UIEvent>,
}

impl EventNavigator {
    pub fn new(
        databases: Arc<dyn DatabaseRegistry>,
        ui_sender: mpsc::UnboundedSender<UIEvent>,
    ) -> Self {
        Self {
            databases,
            ui_sender,
        }
    }

    fn emit(&self, event: UIEvent) {
        if self.ui_sender.send(event).is_err() {
            debug!("UI receiver dropped, discarding event");
        }
    }
}

#[async_trait]
impl Navigator for EventNavigator {
    async fn switch_to_channel_by_name(
        &self,
        server_url: &str,
        channel_name: &str,
        team_name: &str,
    ) -> Result<()> {
        let database = self
            .databases
            .get_database(server_url)
            .ok_or_else(|| anyhow!("{} database not found", server_url))?;
        let channel = database
            .get_channel_by_name(team_name, channel_name)
            .await?
            .ok_or_else(|| anyhow!("channel {} not found in team {}", channel_name, team_name))?;

        self.emit(UIEvent::ChannelOpened {
            server_url: server_url.to_string(),
            channel_id: channel.id,
            channel_name: Some(channel.name),
        });
        Ok(())
    }

    async fn switch_to_channel_by_id(&self, server_url: &str, channel_id: &str) -> Result<()> {
        let channel_name = match self.databases.get_database(server_url) {
            Some(database) => database
                .get_channel_by_id(channel_id)
                .await?
                .map(|c| c.name),
            None => None,
        };

        self.emit(UIEvent::ChannelOpened {
            server_url: server_url.to_string(),
            channel_id: channel_id.to_string(),
            channel_name,
        });
        Ok(())
    }

    async fn show_permalink(
        &self,
        server_url: &str,
        team_name: &str,
        post_id: &str,
    ) -> Result<()> {
        self.emit(UIEvent::PermalinkShown {
            server_url: server_url.to_string(),
            team_name: team_name.to_string(),
            post_id: post_id.to_string(),
        });
        Ok(())
    }

    async fn make_direct_channel(
        &self,
        server_url: &str,
        user_id: &str,
        display_name: &str,
        from_search: bool,
    ) -> Result<()> {
        self.emit(UIEvent::DirectChannelOpened {
            server_url: server_url.to_string(),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            from_search,
        });
        Ok(())
    }

    fn show_app_form(&self, form: &AppForm, context: &AppContext) {
        self.emit(UIEvent::AppFormShown {
            form: form.clone(),
            context: context.clone(),
        });
    }

    fn show_plugin_screen(&self, plugin_id: &str, link: &str) {
        self.emit(UIEvent::PluginScreenShown {
            plugin_id: plugin_id.to_string(),
            link: link.to_string(),
        });
    }

    /// Only absolute URLs with a host can be handed to the system browser.
    async fn open_external_url(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("{} has no host", url));
        }

        self.emit(UIEvent::ExternalUrlOpened(url.to_string()));
        Ok(())
    }

    fn alert(&self, title: &str, message: &str) {
        self.emit(UIEvent::Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
