//! The extensible "apps" command subsystem: response types, the command
//! parser, and the gateway that submits calls to a server.
pub mod parser;
pub mod types;

pub use parser::{AppCommandParser, BindingParser, CommandScope};
pub use types::{AppCallRequest, AppCallResponse, AppCallResponseType, AppForm};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ClientRegistry;
use crate::error::AppCallFailure;
use crate::storage::DatabaseRegistry;

/// Entry point to the apps framework of a server.
#[async_trait]
pub trait AppsGateway: Send + Sync {
    /// Whether app commands should be routed through the apps framework on `server_url`.
    async fn is_enabled(&self, server_url: &str) -> bool;

    /// Submits `call` and returns the app's response.
    ///
    /// Transport failures and responses typed `error` both come back as
    /// `AppCallFailure`.
    async fn submit_call(
        &self,
        server_url: &str,
        call: &AppCallRequest,
    ) -> Result<AppCallResponse, AppCallFailure>;
}

/// The default gateway: reads the feature flag from the server's stored
/// configuration and submits calls through the server's network client.
pub struct AppsManager {
    clients: Arc<dyn ClientRegistry>,
    databases: Arc<dyn DatabaseRegistry>,
}

impl AppsManager {
    pub fn new(clients: Arc<dyn ClientRegistry>, databases: Arc<dyn DatabaseRegistry>) -> Self {
        Self { clients, databases }
    }
}

#[async_trait]
impl AppsGateway for AppsManager {
    async fn is_enabled(&self, server_url: &str) -> bool {
        let Some(database) = self.databases.get_database(server_url) else {
            return false;
        };

        match database.get_config().await {
            Ok(config) => config.feature_flag_apps_enabled,
            Err(e) => {
                warn!("Could not read config for {}: {}", server_url, e);
                false
            }
        }
    }

    async fn submit_call(
        &self,
        server_url: &str,
        call: &AppCallRequest,
    ) -> Result<AppCallResponse, AppCallFailure> {
        let client = self
            .clients
            .get_client(server_url)
            .map_err(|e| AppCallFailure::new(e.to_string()))?;

        match client.execute_app_call(call).await {
            Ok(response) if response.response_type == AppCallResponseType::Error => {
                debug!("App {} answered with an error", call.context.app_id);
                Err(AppCallFailure {
                    text: response.text,
                })
            }
            Ok(response) => Ok(response),
            Err(e) => Err(AppCallFailure::new(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NetworkManager;
    use crate::storage::{ServerRegistry, SledServerDatabase};
    use crate::testing::StubClient;
    use crate::types::SiteConfig;

    const SERVER: &str = "https://chat.example.com";

    async fn manager(apps_enabled: bool, client: Option<Arc<StubClient>>) -> AppsManager {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let store = SledServerDatabase::new(&db, SERVER).unwrap();
        store
            .set_config(&SiteConfig {
                feature_flag_apps_enabled: apps_enabled,
                ..SiteConfig::default()
            })
            .await
            .unwrap();

        let databases = Arc::new(ServerRegistry::new());
        databases.register(SERVER, Arc::new(store));
        let clients = Arc::new(NetworkManager::new());
        if let Some(client) = client {
            clients.add_client(SERVER, client);
        }

        AppsManager::new(clients, databases)
    }

    #[tokio::test]
    async fn enabled_follows_the_feature_flag() {
        assert!(manager(true, None).await.is_enabled(SERVER).await);
        assert!(!manager(false, None).await.is_enabled(SERVER).await);
        assert!(!manager(true, None).await.is_enabled("https://unknown.example.com").await);
    }

    #[tokio::test]
    async fn error_typed_responses_become_failures() {
        let client = Arc::new(StubClient::default());
        let mut response = AppCallResponse::with_type(AppCallResponseType::Error);
        response.text = Some("issue not found".into());
        client.set_app_response(Ok(response));

        let apps = manager(true, Some(client.clone())).await;
        let failure = apps
            .submit_call(SERVER, &AppCallRequest::default())
            .await
            .unwrap_err();
        assert_eq!(failure.text(), Some("issue not found"));
        assert_eq!(client.app_calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_client_is_a_failure() {
        let apps = manager(true, None).await;
        let failure = apps
            .submit_call(SERVER, &AppCallRequest::default())
            .await
            .unwrap_err();
        assert!(failure.to_string().contains(SERVER));
    }
}
