//! This module defines the network client interface used by the dispatcher
//! and the registry that hands out one client per server.
pub mod rest;

pub use rest::RestClient;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::apps::types::{AppCallRequest, AppCallResponse};
use crate::error::{ClientError, DispatchError};
use crate::types::{AutocompleteSuggestion, Command, CommandArgs, CommandResponse};

/// The server operations the dispatcher needs.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Executes `command` on the server in the context given by `args`.
    async fn execute_command(
        &self,
        command: &str,
        args: &CommandArgs,
    ) -> Result<CommandResponse, ClientError>;

    /// Lists the commands available to the current user in `team_id`.
    async fn get_commands_list(&self, team_id: &str) -> Result<Vec<Command>, ClientError>;

    async fn get_command_autocomplete_suggestions(
        &self,
        user_input: &str,
        team_id: &str,
        channel_id: &str,
        root_id: Option<&str>,
    ) -> Result<Vec<AutocompleteSuggestion>, ClientError>;

    /// Submits a call to the apps framework.
    async fn execute_app_call(
        &self,
        call: &AppCallRequest,
    ) -> Result<AppCallResponse, ClientError>;
}

/// Hands out the network client for a server.
pub trait ClientRegistry: Send + Sync {
    fn get_client(&self, server_url: &str) -> Result<Arc<dyn NetworkClient>, DispatchError>;
}

/// An in-process `ClientRegistry`.
#[derive(Default)]
pub struct NetworkManager {
    clients: RwLock<HashMap<String, Arc<dyn NetworkClient>>>,
}

impl NetworkManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&self, server_url: &str, client: Arc<dyn NetworkClient>) {
        if let Ok(mut clients) = self.clients.write() {
            clients.insert(server_url.to_string(), client);
        }
    }

    pub fn remove_client(&self, server_url: &str) {
        if let Ok(mut clients) = self.clients.write() {
            clients.remove(server_url);
        }
    }
}

impl ClientRegistry for NetworkManager {
    fn get_client(&self, server_url: &str) -> Result<Arc<dyn NetworkClient>, DispatchError> {
        self.clients
            .read()
            .ok()
            .and_then(|clients| clients.get(server_url).cloned())
            .ok_or_else(|| DispatchError::ClientNotFound(server_url.to_string()))
    }
}
