//! Slash command execution: classification, server execution, app commands,
//! and the read-only command listing and suggestion fetchers.
mod app;
pub mod normalize;

pub use normalize::{filter_em_dash, normalize_command};

use tracing::{debug, info, warn};

use crate::apps::{AppCallResponse, CommandScope};
use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::outcome::Outcome;
use crate::storage::ServerDatabase;
use crate::types::{AutocompleteSuggestion, Command, CommandArgs, CommandResponse};

/// What handled a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The server executed the command.
    Server(CommandResponse),
    /// An app handled the command; its response has already been acted upon.
    App(AppCallResponse),
}

impl Dispatcher {
    /// Executes `message` as typed in `channel_id` (and thread `root_id`) on `server_url`.
    ///
    /// App commands go to the apps framework when it is enabled for the
    /// server; everything else is normalized and executed by the server.
    pub async fn execute_command(
        &self,
        server_url: &str,
        message: &str,
        channel_id: &str,
        root_id: Option<&str>,
    ) -> Outcome<CommandOutcome> {
        self.try_execute_command(server_url, message, channel_id, root_id)
            .await
            .into()
    }

    async fn try_execute_command(
        &self,
        server_url: &str,
        message: &str,
        channel_id: &str,
        root_id: Option<&str>,
    ) -> Result<CommandOutcome, DispatchError> {
        let database = self.database(server_url)?;
        let client = self.client(server_url)?;

        let team_id = resolve_team_id(database.as_ref(), channel_id).await?;
        let args = CommandArgs::new(channel_id, &team_id, root_id);

        if self.services.apps.is_enabled(server_url).await {
            let scope = CommandScope {
                server_url: server_url.to_string(),
                channel_id: args.channel_id.clone(),
                team_id: args.team_id.clone(),
                root_id: args.root_id.clone(),
            };
            if self.services.parser.is_app_command(&scope, message).await {
                info!("Routing app command to the apps framework on {}", server_url);
                let response = self
                    .execute_app_command(server_url, database.as_ref(), &scope, message, &args)
                    .await?;
                return Ok(CommandOutcome::App(response));
            }
        }

        let command = normalize_command(message);
        debug!("Executing server command on {}", server_url);
        let response = client.execute_command(&command, &args).await.map_err(|e| {
            warn!("Command failed on {}: {}", server_url, e);
            DispatchError::from(e)
        })?;

        if let Some(trigger_id) = response.trigger_id() {
            self.services
                .integrations
                .set_trigger_id(server_url, trigger_id);
        }

        Ok(CommandOutcome::Server(response))
    }

    /// The team commands typed in `channel_id` run in.
    pub async fn resolve_team(&self, server_url: &str, channel_id: &str) -> Outcome<String> {
        let result = async {
            let database = self.database(server_url)?;
            resolve_team_id(database.as_ref(), channel_id).await
        };
        result.await.into()
    }

    /// Lists the commands available in `team_id`.
    pub async fn fetch_commands(&self, server_url: &str, team_id: &str) -> Outcome<Vec<Command>> {
        let result = async {
            let client = self.client(server_url)?;
            Ok::<_, DispatchError>(client.get_commands_list(team_id).await?)
        };
        result.await.into()
    }

    /// Lists autocomplete suggestions for a partially typed command.
    pub async fn fetch_suggestions(
        &self,
        server_url: &str,
        user_input: &str,
        team_id: &str,
        channel_id: &str,
        root_id: Option<&str>,
    ) -> Outcome<Vec<AutocompleteSuggestion>> {
        let result = async {
            let client = self.client(server_url)?;
            let suggestions = client
                .get_command_autocomplete_suggestions(user_input, team_id, channel_id, root_id)
                .await?;
            Ok::<_, DispatchError>(suggestions)
        };
        result.await.into()
    }
}

/// The team of the channel, or the current team if the channel is unknown.
async fn resolve_team_id(
    database: &dyn ServerDatabase,
    channel_id: &str,
) -> Result<String, DispatchError> {
    let channel_team = database
        .get_channel_by_id(channel_id)
        .await?
        .map(|c| c.team_id)
        .filter(|id| !id.is_empty());

    match channel_team {
        Some(team_id) => Ok(team_id),
        None => Ok(database.get_current_team_id().await?.unwrap_or_default()),
    }
}
