//! This module defines the per-server database interface, the registry that
//! maps server URLs to databases, and the `sled` implementation.
pub mod server;

pub use server::SledServerDatabase;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::server_url;
use crate::types::{Channel, Post, SiteConfig, Team, User};

/// Read access to one server's local state, plus the ephemeral post sink.
#[async_trait]
pub trait ServerDatabase: Send + Sync {
    /// Returns the server's client configuration, or the defaults if none was stored.
    async fn get_config(&self) -> Result<SiteConfig>;

    async fn get_current_team_id(&self) -> Result<Option<String>>;

    async fn get_channel_by_id(&self, channel_id: &str) -> Result<Option<Channel>>;

    /// Looks up a channel by its URL name inside the team with URL name `team_name`.
    async fn get_channel_by_name(
        &self,
        team_name: &str,
        channel_name: &str,
    ) -> Result<Option<Channel>>;

    async fn get_team_by_name(&self, team_name: &str) -> Result<Option<Team>>;

    /// Looks up a user by username, case-insensitively.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Stores a post that is only visible to the current user.
    async fn add_ephemeral_post(&self, post: Post) -> Result<()>;
}

/// Maps server URLs to their databases.
pub trait DatabaseRegistry: Send + Sync {
    fn get_database(&self, server_url: &str) -> Option<Arc<dyn ServerDatabase>>;

    /// Finds the registered server URL that `candidate` refers to.
    ///
    /// `candidate` may lack a scheme or carry a trailing slash.
    fn search_url(&self, candidate: &str) -> Option<String>;
}

/// An in-process `DatabaseRegistry`.
#[derive(Default)]
pub struct ServerRegistry {
    databases: RwLock<HashMap<String, Arc<dyn ServerDatabase>>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, server_url: &str, database: Arc<dyn ServerDatabase>) {
        if let Ok(mut databases) = self.databases.write() {
            databases.insert(server_url.to_string(), database);
        }
    }
}

impl DatabaseRegistry for ServerRegistry {
    fn get_database(&self, server_url: &str) -> Option<Arc<dyn ServerDatabase>> {
        self.databases.read().ok()?.get(server_url).cloned()
    }

    fn search_url(&self, candidate: &str) -> Option<String> {
        let wanted = server_url::normalize(candidate);
        self.databases
            .read()
            .ok()?
            .keys()
            .find(|url| server_url::normalize(url) == wanted)
            .cloned()
    }
}
