//! Stubs and fixtures shared by the unit tests.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::apps::types::{AppBinding, AppCall, AppCallRequest, AppCallResponse};
use crate::apps::{AppsManager, BindingParser};
use crate::client::{NetworkClient, NetworkManager};
use crate::deep_link::UrlDeepLinkMatcher;
use crate::dispatcher::{Dispatcher, Services};
use crate::error::ClientError;
use crate::i18n::DefaultLocalizer;
use crate::integrations::IntegrationsManager;
use crate::storage::{ServerRegistry, SledServerDatabase};
use crate::types::{
    AutocompleteSuggestion, Channel, Command, CommandArgs, CommandResponse, SiteConfig, Team,
    TeammateNameDisplay, User,
};
use crate::ui::{EventNavigator, UIEvent};

/// A `NetworkClient` that records what it was asked and answers from canned responses.
pub struct StubClient {
    command_response: Mutex<Result<CommandResponse, ClientError>>,
    app_response: Mutex<Result<AppCallResponse, ClientError>>,
    commands: Mutex<Result<Vec<Command>, ClientError>>,
    executed: Mutex<Vec<(String, CommandArgs)>>,
    app_calls: Mutex<Vec<AppCallRequest>>,
}

impl Default for StubClient {
    fn default() -> Self {
        Self {
            command_response: Mutex::new(Ok(CommandResponse::default())),
            app_response: Mutex::new(Ok(AppCallResponse::ok(""))),
            commands: Mutex::new(Ok(Vec::new())),
            executed: Mutex::new(Vec::new()),
            app_calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubClient {
    pub fn set_command_response(&self, response: Result<CommandResponse, ClientError>) {
        *self.command_response.lock().unwrap() = response;
    }

    pub fn set_app_response(&self, response: Result<AppCallResponse, ClientError>) {
        *self.app_response.lock().unwrap() = response;
    }

    pub fn set_commands(&self, commands: Result<Vec<Command>, ClientError>) {
        *self.commands.lock().unwrap() = commands;
    }

    pub fn executed(&self) -> Vec<(String, CommandArgs)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn app_calls(&self) -> Vec<AppCallRequest> {
        self.app_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for StubClient {
    async fn execute_command(
        &self,
        command: &str,
        args: &CommandArgs,
    ) -> Result<CommandResponse, ClientError> {
        self.executed
            .lock()
            .unwrap()
            .push((command.to_string(), args.clone()));
        self.command_response.lock().unwrap().clone()
    }

    async fn get_commands_list(&self, _team_id: &str) -> Result<Vec<Command>, ClientError> {
        self.commands.lock().unwrap().clone()
    }

    async fn get_command_autocomplete_suggestions(
        &self,
        user_input: &str,
        _team_id: &str,
        _channel_id: &str,
        _root_id: Option<&str>,
    ) -> Result<Vec<AutocompleteSuggestion>, ClientError> {
        Ok(vec![AutocompleteSuggestion {
            complete: format!("{}ing", user_input),
            suggestion: format!("{}ing", user_input),
            ..AutocompleteSuggestion::default()
        }])
    }

    async fn execute_app_call(
        &self,
        call: &AppCallRequest,
    ) -> Result<AppCallResponse, ClientError> {
        self.app_calls.lock().unwrap().push(call.clone());
        self.app_response.lock().unwrap().clone()
    }
}

pub const SERVER: &str = "https://chat.example.com";
pub const OTHER_SERVER: &str = "https://other.example.com";
pub const CHANNEL_ID: &str = "channel1";
pub const TEAM_ID: &str = "team1";

/// A dispatcher wired to temporary sled databases, a stub client and an
/// `EventNavigator` whose events can be drained.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub client: Arc<StubClient>,
    pub store: Arc<SledServerDatabase>,
    pub databases: Arc<ServerRegistry>,
    pub clients: Arc<NetworkManager>,
    pub parser: Arc<BindingParser>,
    pub integrations: Arc<IntegrationsManager>,
    db: sled::Db,
    events: mpsc::UnboundedReceiver<UIEvent>,
}

impl Harness {
    pub async fn new(apps_enabled: bool) -> Self {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let store = Arc::new(SledServerDatabase::new(&db, SERVER).unwrap());
        seed(&store, apps_enabled, Some("https://public.example.com")).await;

        let databases = Arc::new(ServerRegistry::new());
        databases.register(SERVER, store.clone());

        let client = Arc::new(StubClient::default());
        let clients = Arc::new(NetworkManager::new());
        clients.add_client(SERVER, client.clone());

        let localizer = Arc::new(DefaultLocalizer::new());
        let parser = Arc::new(BindingParser::new(localizer.clone()));
        parser.set_bindings(SERVER, vec![jira_binding()]);

        let (ui_sender, events) = mpsc::unbounded_channel();
        let integrations = Arc::new(IntegrationsManager::new());

        let dispatcher = Dispatcher::new(Services {
            clients: clients.clone(),
            databases: databases.clone(),
            apps: Arc::new(AppsManager::new(clients.clone(), databases.clone())),
            parser: parser.clone(),
            matcher: Arc::new(UrlDeepLinkMatcher::default()),
            navigator: Arc::new(EventNavigator::new(databases.clone(), ui_sender)),
            localizer,
            integrations: integrations.clone(),
        });

        Self {
            dispatcher,
            client,
            store,
            databases,
            clients,
            parser,
            integrations,
            db,
            events,
        }
    }

    /// Registers a second server sharing the same sled database.
    pub async fn add_other_server(&self) -> Arc<SledServerDatabase> {
        let store = Arc::new(SledServerDatabase::new(&self.db, OTHER_SERVER).unwrap());
        seed(&store, false, None).await;
        self.databases.register(OTHER_SERVER, store.clone());
        store
    }

    /// Drains every UI event emitted so far.
    pub fn events(&mut self) -> Vec<UIEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

async fn seed(store: &SledServerDatabase, apps_enabled: bool, site_url: Option<&str>) {
    store
        .set_config(&SiteConfig {
            site_url: site_url.map(str::to_string),
            feature_flag_apps_enabled: apps_enabled,
            teammate_name_display: TeammateNameDisplay::FullName,
        })
        .await
        .unwrap();
    store.set_current_team_id("current-team").await.unwrap();
    store
        .put_team(&Team {
            id: TEAM_ID.into(),
            name: "core".into(),
            display_name: "Core".into(),
        })
        .await
        .unwrap();
    store
        .put_channel(&Channel {
            id: CHANNEL_ID.into(),
            team_id: TEAM_ID.into(),
            name: "town-square".into(),
            display_name: "Town Square".into(),
        })
        .await
        .unwrap();
    store
        .put_user(&User {
            id: "user1".into(),
            username: "jane".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            nickname: String::new(),
        })
        .await
        .unwrap();
}

fn jira_binding() -> AppBinding {
    AppBinding {
        app_id: "jira".into(),
        label: "jira".into(),
        bindings: vec![AppBinding {
            app_id: "jira".into(),
            label: "create".into(),
            submit: Some(AppCall {
                path: "/create".into(),
                ..AppCall::default()
            }),
            ..AppBinding::default()
        }],
        ..AppBinding::default()
    }
}
