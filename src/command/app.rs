//! Runs app commands and reacts to the app's response.
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::apps::{AppCallRequest, AppCallResponse, AppCallResponseType, CommandScope};
use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::i18n::messages;
use crate::storage::ServerDatabase;
use crate::types::{CommandArgs, Post, POST_TYPE_EPHEMERAL};

impl Dispatcher {
    /// Composes, submits and interprets an app command.
    pub(super) async fn execute_app_command(
        &self,
        server_url: &str,
        database: &dyn ServerDatabase,
        scope: &CommandScope,
        message: &str,
        args: &CommandArgs,
    ) -> Result<AppCallResponse, DispatchError> {
        let services = &self.services;

        let call = services
            .parser
            .compose_submit_call(scope, message)
            .await
            .map_err(DispatchError::App)?;

        debug!("Submitting app call {} for {}", call.path, call.context.app_id);
        let response = services
            .apps
            .submit_call(server_url, &call)
            .await
            .map_err(|failure| {
                let text = failure
                    .text()
                    .map(str::to_string)
                    .unwrap_or_else(|| services.localizer.text(&messages::APPS_UNKNOWN_ERROR));
                DispatchError::App(text)
            })?;

        self.handle_app_response(server_url, database, &call, &response, args)
            .await?;
        Ok(response)
    }

    async fn handle_app_response(
        &self,
        server_url: &str,
        database: &dyn ServerDatabase,
        call: &AppCallRequest,
        response: &AppCallResponse,
        args: &CommandArgs,
    ) -> Result<(), DispatchError> {
        match &response.response_type {
            AppCallResponseType::Ok => {
                if let Some(text) = response.text.as_deref().filter(|t| !t.is_empty()) {
                    post_ephemeral(database, call, text, args).await;
                }
            }
            AppCallResponseType::Form => {
                if let Some(form) = &response.form {
                    self.services.navigator.show_app_form(form, &call.context);
                }
            }
            AppCallResponseType::Navigate => {
                if let Some(url) = response.navigate_to_url.as_deref().filter(|u| !u.is_empty()) {
                    info!("App {} navigates to {}", call.context.app_id, url);
                    let outcome = self.handle_goto_location(server_url, url).await;
                    if let Some(err) = outcome.error() {
                        warn!("Navigation requested by app failed: {}", err);
                    }
                }
            }
            other => {
                return Err(DispatchError::App(self.services.localizer.format(
                    &messages::APPS_UNKNOWN_RESPONSE_TYPE,
                    &[("type", other.as_str())],
                )));
            }
        }

        Ok(())
    }
}

/// Shows `text` to the invoking user only, in the channel or thread the
/// command was typed in.
async fn post_ephemeral(
    database: &dyn ServerDatabase,
    call: &AppCallRequest,
    text: &str,
    args: &CommandArgs,
) {
    let mut props = serde_json::Map::new();
    props.insert("from_app".into(), true.into());
    props.insert("app_id".into(), call.context.app_id.clone().into());

    let post = Post {
        id: Uuid::new_v4().simple().to_string(),
        channel_id: args.channel_id.clone(),
        root_id: args.root_id.clone(),
        message: text.to_string(),
        post_type: POST_TYPE_EPHEMERAL.to_string(),
        create_at: Utc::now().timestamp_millis(),
        props,
    };

    if let Err(e) = database.add_ephemeral_post(post).await {
        warn!("Failed to store ephemeral app response: {}", e);
    }
}
