//! A `ServerDatabase` implementation backed by `sled`.
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;

use crate::server_url;
use crate::types::{Channel, Post, SiteConfig, Team, User};

use super::ServerDatabase;

const CONFIG_KEY: &str = "config";
const CURRENT_TEAM_KEY: &str = "current_team_id";

/// Stores one server's channels, teams, users and ephemeral posts.
///
/// Every server gets its own set of trees, prefixed with its normalized URL,
/// so several servers can share one `sled::Db`.
pub struct SledServerDatabase {
    channels: sled::Tree,
    teams: sled::Tree,
    users: sled::Tree,
    system: sled::Tree,
    posts: sled::Tree,
}

impl SledServerDatabase {
    /// Opens (or creates) the trees for `server_url` in `db`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the trees cannot be opened.
    pub fn new(db: &Db, server_url: &str) -> Result<Self> {
        let prefix = server_url::normalize(server_url);
        let open = |name: &str| db.open_tree(format!("{}:{}", prefix, name));

        Ok(Self {
            channels: open("channels")?,
            teams: open("teams")?,
            users: open("users")?,
            system: open("system")?,
            posts: open("posts")?,
        })
    }

    pub async fn put_channel(&self, channel: &Channel) -> Result<()> {
        put(&self.channels, &channel.id, channel).await
    }

    pub async fn put_team(&self, team: &Team) -> Result<()> {
        put(&self.teams, &team.id, team).await
    }

    /// Users are keyed by username, the only lookup deep links need.
    pub async fn put_user(&self, user: &User) -> Result<()> {
        put(&self.users, &user.username.to_lowercase(), user).await
    }

    pub async fn set_config(&self, config: &SiteConfig) -> Result<()> {
        put(&self.system, CONFIG_KEY, config).await
    }

    pub async fn set_current_team_id(&self, team_id: &str) -> Result<()> {
        put(&self.system, CURRENT_TEAM_KEY, team_id).await
    }

    /// Lists stored ephemeral posts for a channel, oldest first.
    pub async fn posts_in_channel(&self, channel_id: &str) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for entry in self.posts.iter() {
            let (_key, value) = entry?;
            let post: Post = serde_json::from_slice(&value)?;
            if post.channel_id == channel_id {
                posts.push(post);
            }
        }
        posts.sort_by_key(|p| p.create_at);
        Ok(posts)
    }
}

async fn put<T: Serialize + ?Sized>(tree: &sled::Tree, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    tree.insert(key.as_bytes(), bytes)?;
    tree.flush_async().await?;
    Ok(())
}

fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &str) -> Result<Option<T>> {
    match tree.get(key.as_bytes())? {
        Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl ServerDatabase for SledServerDatabase {
    async fn get_config(&self) -> Result<SiteConfig> {
        Ok(get(&self.system, CONFIG_KEY)?.unwrap_or_default())
    }

    async fn get_current_team_id(&self) -> Result<Option<String>> {
        get(&self.system, CURRENT_TEAM_KEY)
    }

    async fn get_channel_by_id(&self, channel_id: &str) -> Result<Option<Channel>> {
        get(&self.channels, channel_id)
    }

    async fn get_channel_by_name(
        &self,
        team_name: &str,
        channel_name: &str,
    ) -> Result<Option<Channel>> {
        let Some(team) = self.get_team_by_name(team_name).await? else {
            return Ok(None);
        };

        for entry in self.channels.iter() {
            let (_key, value) = entry?;
            let channel: Channel = serde_json::from_slice(&value)?;
            if channel.team_id == team.id && channel.name == channel_name {
                return Ok(Some(channel));
            }
        }

        Ok(None)
    }

    async fn get_team_by_name(&self, team_name: &str) -> Result<Option<Team>> {
        for entry in self.teams.iter() {
            let (_key, value) = entry?;
            let team: Team = serde_json::from_slice(&value)?;
            if team.name == team_name {
                return Ok(Some(team));
            }
        }
        Ok(None)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        get(&self.users, &username.to_lowercase())
    }

    async fn add_ephemeral_post(&self, post: Post) -> Result<()> {
        put(&self.posts, &post.id, &post).await
    }
}
