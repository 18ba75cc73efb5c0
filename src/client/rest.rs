//! REST implementation of `NetworkClient` against the server's v4 API.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::apps::types::{AppCallRequest, AppCallResponse};
use crate::error::ClientError;
use crate::types::{AutocompleteSuggestion, Command, CommandArgs, CommandResponse};

use super::NetworkClient;

const APPS_PLUGIN_ROUTE: &str = "/plugins/com.mattermost.apps/api/v1";

/// A token-authenticated HTTP client for one server.
pub struct RestClient {
    http: Client,
    server_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ExecuteCommandBody<'a> {
    command: &'a str,
    #[serde(flatten)]
    args: &'a CommandArgs,
}

impl RestClient {
    /// Creates a client for `server_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        server_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chat-commands/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
    })
}

/// Extracts the server's `message` field from an error body.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl NetworkClient for RestClient {
    async fn execute_command(
        &self,
        command: &str,
        args: &CommandArgs,
    ) -> Result<CommandResponse, ClientError> {
        debug!("POST commands/execute on {}", self.server_url);
        let body = ExecuteCommandBody { command, args };
        let request = self.http.post(self.url("/api/v4/commands/execute")).json(&body);
        self.send(request).await
    }

    async fn get_commands_list(&self, team_id: &str) -> Result<Vec<Command>, ClientError> {
        let request = self
            .http
            .get(self.url("/api/v4/commands"))
            .query(&[("team_id", team_id)]);
        self.send(request).await
    }

    async fn get_command_autocomplete_suggestions(
        &self,
        user_input: &str,
        team_id: &str,
        channel_id: &str,
        root_id: Option<&str>,
    ) -> Result<Vec<AutocompleteSuggestion>, ClientError> {
        let path = format!("/api/v4/teams/{}/commands/autocomplete_suggestions", team_id);
        let request = self.http.get(self.url(&path)).query(&[
            ("user_input", user_input),
            ("team_id", team_id),
            ("channel_id", channel_id),
            ("root_id", root_id.unwrap_or_default()),
        ]);
        self.send(request).await
    }

    async fn execute_app_call(
        &self,
        call: &AppCallRequest,
    ) -> Result<AppCallResponse, ClientError> {
        debug!("Submitting app call {} to {}", call.path, call.context.app_id);
        let request = self
            .http
            .post(self.url(&format!("{}/call", APPS_PLUGIN_ROUTE)))
            .json(call);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let client =
            RestClient::new("https://chat.example.com/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("/api/v4/commands"),
            "https://chat.example.com/api/v4/commands"
        );
    }

    #[test]
    fn error_message_prefers_server_message() {
        let body = r#"{"id":"api.command.execute_command.not_found.app_error","message":"Command with a trigger of 'foo' not found."}"#;
        assert_eq!(
            error_message(body, "Not Found"),
            "Command with a trigger of 'foo' not found."
        );
        assert_eq!(error_message("<html>", "Not Found"), "Not Found");
        assert_eq!(error_message(r#"{"message":""}"#, "Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn execute_body_flattens_args() {
        let args = CommandArgs::new("c1", "t1", Some("r1"));
        let body = serde_json::to_value(ExecuteCommandBody { command: "/away", args: &args }).unwrap();
        assert_eq!(body["command"], "/away");
        assert_eq!(body["channel_id"], "c1");
        assert_eq!(body["parent_id"], "r1");
    }
}
