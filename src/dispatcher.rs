//! This module defines the `Dispatcher`, which holds the collaborators used by
//! the command and deep-link pipelines.
use std::sync::Arc;

use crate::apps::{AppCommandParser, AppsGateway};
use crate::client::{ClientRegistry, NetworkClient};
use crate::deep_link::DeepLinkMatcher;
use crate::error::DispatchError;
use crate::i18n::Localizer;
use crate::integrations::IntegrationsManager;
use crate::storage::{DatabaseRegistry, ServerDatabase};
use crate::ui::Navigator;

/// The collaborators a `Dispatcher` works with.
#[derive(Clone)]
pub struct Services {
    pub clients: Arc<dyn ClientRegistry>,
    pub databases: Arc<dyn DatabaseRegistry>,
    pub apps: Arc<dyn AppsGateway>,
    pub parser: Arc<dyn AppCommandParser>,
    pub matcher: Arc<dyn DeepLinkMatcher>,
    pub navigator: Arc<dyn Navigator>,
    pub localizer: Arc<dyn Localizer>,
    pub integrations: Arc<IntegrationsManager>,
}

/// Runs slash commands and deep links for any registered server.
///
/// Cloning is cheap; clones share the same collaborators.
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) services: Arc<Services>,
}

impl Dispatcher {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    pub(crate) fn database(
        &self,
        server_url: &str,
    ) -> Result<Arc<dyn ServerDatabase>, DispatchError> {
        self.services
            .databases
            .get_database(server_url)
            .ok_or_else(|| DispatchError::DatabaseNotFound(server_url.to_string()))
    }

    pub(crate) fn client(
        &self,
        server_url: &str,
    ) -> Result<Arc<dyn NetworkClient>, DispatchError> {
        self.services.clients.get_client(server_url)
    }
}
