//! Console configuration: which servers to talk to and what to seed their
//! local databases with.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::apps::types::AppBinding;
use crate::types::{Channel, Team, TeammateNameDisplay, User};

/// Environment variable consulted when a server has no token configured.
pub const TOKEN_ENV: &str = "CHAT_COMMANDS_TOKEN";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    /// URL of the server the console starts on. Defaults to the first one.
    #[serde(default)]
    pub active_server: Option<String>,
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Message id to replacement text.
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub apps_enabled: bool,
    #[serde(default)]
    pub teammate_name_display: TeammateNameDisplay,
    #[serde(default)]
    pub current_team_id: Option<String>,
    #[serde(default)]
    pub default_channel_id: Option<String>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub app_bindings: Vec<AppBinding>,
}

fn default_url_scheme() -> String {
    "mattermost".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            active_server: None,
            url_scheme: default_url_scheme(),
            http_timeout_secs: default_http_timeout_secs(),
            translations: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        config.apply_env_token(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for server in &self.servers {
            if server.url.trim().is_empty() {
                bail!("Server entry is missing a url");
            }
        }
        if let Some(active) = &self.active_server {
            if self.server(active).is_none() {
                bail!("Active server {} is not configured", active);
            }
        }
        Ok(())
    }

    /// Fills in `token` for servers that have none.
    pub fn apply_env_token(&mut self, token: Option<String>) {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return;
        };
        for server in self.servers.iter_mut().filter(|s| s.token.is_none()) {
            server.token = Some(token.clone());
        }
    }

    pub fn server(&self, url: &str) -> Option<&ServerConfig> {
        self.servers
            .iter()
            .find(|s| crate::server_url::same_server(&s.url, url))
    }

    /// The server the console should start on.
    pub fn active(&self) -> Option<&ServerConfig> {
        match &self.active_server {
            Some(url) => self.server(url),
            None => self.servers.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "servers": [
            {
                "url": "https://chat.example.com",
                "site_url": "https://public.example.com",
                "apps_enabled": true,
                "teams": [{"id": "t1", "name": "core", "display_name": "Core"}]
            },
            {"url": "https://other.example.com", "token": "secret"}
        ],
        "active_server": "chat.example.com/"
    }"#;

    #[test]
    fn parses_with_defaults() {
        let config = AppConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.url_scheme, "mattermost");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[0].teams[0].name, "core");
        assert_eq!(
            config.active().map(|s| s.url.as_str()),
            Some("https://chat.example.com")
        );
    }

    #[test]
    fn env_token_only_fills_missing_tokens() {
        let mut config: AppConfig = serde_json::from_str(CONFIG).unwrap();
        config.apply_env_token(Some("from-env".into()));
        assert_eq!(config.servers[0].token.as_deref(), Some("from-env"));
        assert_eq!(config.servers[1].token.as_deref(), Some("secret"));
    }

    #[test]
    fn rejects_unknown_active_server() {
        let raw = r#"{"servers": [{"url": "https://a.example.com"}], "active_server": "b.example.com"}"#;
        assert!(AppConfig::from_json(raw).is_err());
    }
}
