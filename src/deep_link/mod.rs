//! Deep-link resolution: matches a link, resolves the server it belongs to and
//! navigates there, falling back to the system browser.
pub mod matcher;

pub use matcher::{DeepLink, DeepLinkMatcher, DeepLinkWithData, UrlDeepLinkMatcher};

use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::i18n::messages;
use crate::outcome::Outcome;

/// How a link was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Navigation inside the app was dispatched.
    Navigated,
    /// The link was handed to the system browser.
    External,
}

impl Dispatcher {
    /// Opens `location`, a link clicked or returned while on `server_url`.
    pub async fn handle_goto_location(
        &self,
        server_url: &str,
        location: &str,
    ) -> Outcome<LinkOutcome> {
        Outcome::flatten(self.try_goto_location(server_url, location).await)
    }

    async fn try_goto_location(
        &self,
        server_url: &str,
        location: &str,
    ) -> Result<Outcome<LinkOutcome>, DispatchError> {
        let services = &self.services;
        let database = self.database(server_url)?;
        let config = database.get_config().await?;

        let matched = services
            .matcher
            .match_link(location, server_url, config.site_url());
        let resolved = matched.and_then(|m| {
            let link_server = services.databases.search_url(&m.server_url)?;
            Some((link_server, m.link))
        });

        let Some((link_server, link)) = resolved else {
            self.open_external(location).await;
            return Ok(Outcome::Success(LinkOutcome::External));
        };

        info!("Handling {} link for {}", link.kind(), link_server);
        match link {
            DeepLink::Channel {
                team_name,
                channel_name,
            } => {
                if let Err(e) = services
                    .navigator
                    .switch_to_channel_by_name(&link_server, &channel_name, &team_name)
                    .await
                {
                    debug!("Channel link could not be opened: {}", e);
                    self.alert_bad_channel();
                }
            }
            DeepLink::Permalink { team_name, post_id } => {
                if let Err(e) = services
                    .navigator
                    .show_permalink(&link_server, &team_name, &post_id)
                    .await
                {
                    warn!("Permalink could not be shown: {}", e);
                }
            }
            DeepLink::DirectMessage { user_name, .. } => {
                let Some(user_name) = user_name else {
                    self.alert_unknown_user();
                    return Ok(Outcome::SoftFailure("direct message link has no user".into()));
                };

                let link_database = if link_server == server_url {
                    database
                } else {
                    self.database(&link_server)?
                };

                let Some(user) = link_database.get_user_by_username(&user_name).await? else {
                    self.alert_unknown_user();
                    return Ok(Outcome::SoftFailure(format!("unknown user {}", user_name)));
                };

                let link_config = link_database.get_config().await?;
                let display_name = user.display_name(link_config.teammate_name_display);
                if let Err(e) = services
                    .navigator
                    .make_direct_channel(&link_server, &user.id, &display_name, false)
                    .await
                {
                    warn!("Direct channel with {} could not be opened: {}", user_name, e);
                }
            }
            DeepLink::GroupMessage { channel_id, .. } => {
                let Some(channel_id) = channel_id else {
                    self.alert_bad_channel();
                    return Ok(Outcome::SoftFailure("group message link has no channel".into()));
                };

                if let Err(e) = services
                    .navigator
                    .switch_to_channel_by_id(&link_server, &channel_id)
                    .await
                {
                    warn!("Group message {} could not be opened: {}", channel_id, e);
                }
            }
            DeepLink::Plugin { id } => {
                services.navigator.show_plugin_screen(&id, location);
            }
        }

        Ok(Outcome::Success(LinkOutcome::Navigated))
    }

    async fn open_external(&self, location: &str) {
        debug!("No in-app destination for link, opening externally");
        if let Err(e) = self.services.navigator.open_external_url(location).await {
            warn!("Could not open {}: {}", location, e);
            let localizer = &self.services.localizer;
            self.services.navigator.alert(
                &localizer.text(&messages::LINK_ERROR_TITLE),
                &localizer.text(&messages::LINK_NOT_FOUND),
            );
        }
    }

    fn alert_bad_channel(&self) {
        let localizer = &self.services.localizer;
        self.services.navigator.alert(
            &localizer.text(&messages::LINK_ERROR_TITLE),
            &localizer.text(&messages::LINK_BAD_CHANNEL),
        );
    }

    fn alert_unknown_user(&self) {
        let localizer = &self.services.localizer;
        self.services.navigator.alert(
            &localizer.text(&messages::LINK_ERROR_TITLE),
            &localizer.text(&messages::LINK_UNKNOWN_USER),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, CHANNEL_ID, OTHER_SERVER, SERVER};
    use crate::types::User;
    use crate::ui::UIEvent;

    const POST_ID: &str = "abcdefghijklmnopqrstuvwxyz";

    fn alerts(events: &[UIEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                UIEvent::Alert { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn channel_link_switches_channel() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/channels/town-square")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::ChannelOpened {
                server_url: SERVER.into(),
                channel_id: CHANNEL_ID.into(),
                channel_name: Some("town-square".into()),
            }]
        );
    }

    #[tokio::test]
    async fn unreachable_channel_alerts_but_still_reports_navigation() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/channels/gone")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        let events = h.events();
        assert_eq!(
            alerts(&events),
            vec![messages::LINK_BAD_CHANNEL.default_message]
        );
    }

    #[tokio::test]
    async fn site_url_links_resolve_to_the_current_server() {
        let mut h = Harness::new(false).await;
        let link = format!("https://public.example.com/core/pl/{}", POST_ID);
        let outcome = h.dispatcher.handle_goto_location(SERVER, &link).await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::PermalinkShown {
                server_url: SERVER.into(),
                team_name: "core".into(),
                post_id: POST_ID.into(),
            }]
        );
    }

    #[tokio::test]
    async fn direct_message_link_opens_dm_with_display_name() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/messages/@Jane")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::DirectChannelOpened {
                server_url: SERVER.into(),
                user_id: "user1".into(),
                display_name: "Jane Doe".into(),
                from_search: false,
            }]
        );
    }

    #[tokio::test]
    async fn direct_message_link_without_user_is_a_soft_failure() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/messages/@")
            .await;

        assert!(outcome.is_soft_failure());
        assert!(outcome.error().is_none());
        assert_eq!(
            alerts(&h.events()),
            vec![messages::LINK_UNKNOWN_USER.default_message]
        );
    }

    #[tokio::test]
    async fn direct_message_link_to_unknown_user_is_a_soft_failure() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/messages/@ghost")
            .await;

        assert!(outcome.is_soft_failure());
        assert_eq!(alerts(&h.events()).len(), 1);
    }

    #[tokio::test]
    async fn direct_message_link_on_another_server_uses_that_servers_users() {
        let mut h = Harness::new(false).await;
        let other = h.add_other_server().await;
        other
            .put_user(&User {
                id: "user9".into(),
                username: "sam".into(),
                first_name: String::new(),
                last_name: String::new(),
                nickname: String::new(),
            })
            .await
            .unwrap();

        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "mattermost://other.example.com/core/messages/@sam")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::DirectChannelOpened {
                server_url: OTHER_SERVER.into(),
                user_id: "user9".into(),
                display_name: "sam".into(),
                from_search: false,
            }]
        );
    }

    #[tokio::test]
    async fn group_message_link_switches_by_id() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/messages/4f3a9c")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::ChannelOpened {
                server_url: SERVER.into(),
                channel_id: "4f3a9c".into(),
                channel_name: None,
            }]
        );
    }

    #[tokio::test]
    async fn group_message_link_without_id_is_a_soft_failure() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://chat.example.com/core/messages")
            .await;

        assert!(outcome.is_soft_failure());
        assert_eq!(
            alerts(&h.events()),
            vec![messages::LINK_BAD_CHANNEL.default_message]
        );
    }

    #[tokio::test]
    async fn plugin_link_opens_plugin_screen_with_original_link() {
        let mut h = Harness::new(false).await;
        let link = "https://chat.example.com/plugins/com.example.poll/vote";
        let outcome = h.dispatcher.handle_goto_location(SERVER, link).await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::Navigated));
        assert_eq!(
            h.events(),
            vec![UIEvent::PluginScreenShown {
                plugin_id: "com.example.poll".into(),
                link: link.into(),
            }]
        );
    }

    #[tokio::test]
    async fn external_links_are_opened_as_given() {
        let mut h = Harness::new(false).await;
        h.dispatcher
            .handle_goto_location(SERVER, "https://Docs.Example.org")
            .await;

        assert_eq!(
            h.events(),
            vec![UIEvent::ExternalUrlOpened("https://Docs.Example.org".into())]
        );
    }

    #[tokio::test]
    async fn unmatched_links_open_externally_once() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(SERVER, "https://docs.example.org/guide")
            .await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::External));
        assert_eq!(
            h.events(),
            vec![UIEvent::ExternalUrlOpened("https://docs.example.org/guide".into())]
        );
    }

    #[tokio::test]
    async fn links_to_unregistered_servers_open_externally() {
        let mut h = Harness::new(false).await;
        let link = "mattermost://unknown.example.net/core/channels/dev";
        let outcome = h.dispatcher.handle_goto_location(SERVER, link).await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::External));
        let events = h.events();
        let opened = events
            .iter()
            .filter(|e| matches!(e, UIEvent::ExternalUrlOpened(_)))
            .count();
        assert_eq!(opened, 1);
    }

    #[tokio::test]
    async fn unopenable_links_show_an_alert() {
        let mut h = Harness::new(false).await;
        let outcome = h.dispatcher.handle_goto_location(SERVER, "not a link").await;

        assert_eq!(outcome, Outcome::Success(LinkOutcome::External));
        assert_eq!(
            alerts(&h.events()),
            vec![messages::LINK_NOT_FOUND.default_message]
        );
    }

    #[tokio::test]
    async fn missing_database_is_an_error_naming_the_server() {
        let mut h = Harness::new(false).await;
        let outcome = h
            .dispatcher
            .handle_goto_location(
                "https://unknown.example.com",
                "https://chat.example.com/core/channels/town-square",
            )
            .await;

        let err = outcome.error().expect("an error");
        assert!(err.to_string().contains("https://unknown.example.com"));
        assert!(h.events().is_empty());
        assert!(h.client.executed().is_empty());
    }
}
