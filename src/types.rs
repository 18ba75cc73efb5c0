use serde::{Deserialize, Serialize};

/// Context attached to every command sent to the server.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub channel_id: String,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl CommandArgs {
    /// Builds the args for a command typed in `channel_id`, optionally inside a thread.
    ///
    /// `parent_id` always mirrors `root_id`.
    pub fn new(channel_id: &str, team_id: &str, root_id: Option<&str>) -> Self {
        let root_id = root_id.filter(|id| !id.is_empty()).map(str::to_string);
        Self {
            channel_id: channel_id.to_string(),
            team_id: team_id.to_string(),
            parent_id: root_id.clone(),
            root_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CommandResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CommandResponse {
    pub fn trigger_id(&self) -> Option<&str> {
        self.trigger_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn goto_location(&self) -> Option<&str> {
        self.goto_location.as_deref().filter(|loc| !loc.is_empty())
    }
}

/// A slash command registered on the server.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Command {
    #[serde(default)]
    pub id: String,
    pub trigger: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auto_complete: bool,
    #[serde(default)]
    pub auto_complete_desc: String,
    #[serde(default)]
    pub auto_complete_hint: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AutocompleteSuggestion {
    #[serde(default)]
    pub complete: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_data: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
}

impl User {
    /// Formats the user's name according to the server's teammate display setting.
    pub fn display_name(&self, setting: TeammateNameDisplay) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();

        let nickname = self.nickname.trim();

        let preferred = match setting {
            TeammateNameDisplay::Username => "",
            TeammateNameDisplay::NicknameFullName if !nickname.is_empty() => nickname,
            TeammateNameDisplay::NicknameFullName | TeammateNameDisplay::FullName => &full_name,
        };

        if preferred.is_empty() {
            self.username.clone()
        } else {
            preferred.to_string()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeammateNameDisplay {
    #[default]
    Username,
    NicknameFullName,
    FullName,
}

/// The subset of the server's client configuration this crate reads.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub feature_flag_apps_enabled: bool,
    #[serde(default)]
    pub teammate_name_display: TeammateNameDisplay,
}

impl SiteConfig {
    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref().filter(|url| !url.is_empty())
    }
}

pub const POST_TYPE_EPHEMERAL: &str = "system_ephemeral";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub root_id: Option<String>,
    pub message: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub create_at: i64,
    #[serde(default)]
    pub props: serde_json::Map<String, serde_json::Value>,
}
