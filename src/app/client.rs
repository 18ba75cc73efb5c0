//! Wires the configured servers into a `Dispatcher` and runs the console.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::args::AppArgs;
use crate::apps::{AppsManager, BindingParser};
use crate::client::{NetworkManager, RestClient};
use crate::config::{AppConfig, ServerConfig};
use crate::deep_link::UrlDeepLinkMatcher;
use crate::dispatcher::{Dispatcher, Services};
use crate::i18n::DefaultLocalizer;
use crate::integrations::IntegrationsManager;
use crate::storage::{ServerRegistry, SledServerDatabase};
use crate::types::SiteConfig;
use crate::ui::{run_console, ConsoleState, EventNavigator, UIEvent};

/// A dispatcher for every configured server plus the UI event channel its
/// navigator reports to.
pub struct Wiring {
    pub dispatcher: Dispatcher,
    pub ui_sender: mpsc::UnboundedSender<UIEvent>,
    pub ui_rx: mpsc::UnboundedReceiver<UIEvent>,
}

pub async fn run(args: &AppArgs, config: &AppConfig, db: sled::Db) -> Result<()> {
    let active = config
        .active()
        .ok_or_else(|| anyhow!("No server configured. Pass --server or --config."))?;
    let state = initial_state(active, args.channel.as_deref());

    let Wiring {
        dispatcher,
        ui_sender,
        ui_rx,
    } = wire(config, &db).await?;

    println!("Client initialized for {} server(s).\n", config.servers.len());
    run_console(dispatcher, state, ui_sender, ui_rx).await?;

    db.flush_async().await?;
    Ok(())
}

/// Opens a database and a REST client per server and builds the dispatcher.
pub async fn wire(config: &AppConfig, db: &sled::Db) -> Result<Wiring> {
    let databases = Arc::new(ServerRegistry::new());
    let clients = Arc::new(NetworkManager::new());
    let localizer = Arc::new(DefaultLocalizer::with_overrides(config.translations.clone()));
    let parser = Arc::new(BindingParser::new(localizer.clone()));
    let timeout = Duration::from_secs(config.http_timeout_secs);

    for server in &config.servers {
        let store = Arc::new(SledServerDatabase::new(db, &server.url)?);
        seed(&store, server).await?;
        databases.register(&server.url, store);

        if server.token.is_none() {
            warn!("No token for {}; requests will be anonymous", server.url);
        }
        let client = RestClient::new(&server.url, server.token.clone(), timeout)?;
        clients.add_client(&server.url, Arc::new(client));

        parser.set_bindings(&server.url, server.app_bindings.clone());
        info!("Registered server {}", server.url);
    }

    let (ui_sender, ui_rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(Services {
        clients: clients.clone(),
        databases: databases.clone(),
        apps: Arc::new(AppsManager::new(clients, databases.clone())),
        parser,
        matcher: Arc::new(UrlDeepLinkMatcher::new(&config.url_scheme)),
        navigator: Arc::new(EventNavigator::new(databases, ui_sender.clone())),
        localizer,
        integrations: Arc::new(IntegrationsManager::new()),
    });

    Ok(Wiring {
        dispatcher,
        ui_sender,
        ui_rx,
    })
}

/// Writes the configured server state into its local database.
async fn seed(store: &SledServerDatabase, server: &ServerConfig) -> Result<()> {
    store
        .set_config(&SiteConfig {
            site_url: server.site_url.clone(),
            feature_flag_apps_enabled: server.apps_enabled,
            teammate_name_display: server.teammate_name_display,
        })
        .await?;

    if let Some(team_id) = &server.current_team_id {
        store.set_current_team_id(team_id).await?;
    }
    for team in &server.teams {
        store.put_team(team).await?;
    }
    for channel in &server.channels {
        store.put_channel(channel).await?;
    }
    for user in &server.users {
        store.put_user(user).await?;
    }
    Ok(())
}

fn initial_state(server: &ServerConfig, channel: Option<&str>) -> ConsoleState {
    let channel_id = channel
        .map(str::to_string)
        .or_else(|| server.default_channel_id.clone())
        .or_else(|| server.channels.first().map(|c| c.id.clone()))
        .unwrap_or_default();

    let team_id = server
        .channels
        .iter()
        .find(|c| c.id == channel_id)
        .map(|c| c.team_id.clone())
        .filter(|t| !t.is_empty())
        .or_else(|| server.current_team_id.clone())
        .unwrap_or_default();

    ConsoleState {
        server_url: server.url.clone(),
        channel_id,
        team_id,
        root_id: None,
    }
}
