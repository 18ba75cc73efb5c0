//! A line-oriented console front end over the `Dispatcher`.
//!
//! Lines starting with `/` are slash commands; lines starting with `:` are
//! console commands (`:go`, `:commands`, `:suggest`, `:channel`, `:thread`,
//! `:help`, `:quit`).
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::UIEvent;
use crate::command::CommandOutcome;
use crate::deep_link::LinkOutcome;
use crate::dispatcher::Dispatcher;
use crate::outcome::Outcome;
use crate::server_url;

const HELP: &str = "\
/<command> [args]       run a slash command
:go <link>              open a link
:commands               list the team's commands
:suggest <text>         autocomplete a partial command
:channel <channel_id>   switch channel
:thread [root_id]       reply in a thread, or leave it
:quit                   exit";

/// Where typed commands are executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    pub server_url: String,
    pub channel_id: String,
    pub team_id: String,
    pub root_id: Option<String>,
}

pub async fn run_console(
    dispatcher: Dispatcher,
    mut state: ConsoleState,
    ui_sender: mpsc::UnboundedSender<UIEvent>,
    mut ui_rx: mpsc::UnboundedReceiver<UIEvent>,
) -> Result<()> {
    info!("Console ready on {} in channel {}", state.server_url, state.channel_id);
    println!("💬 Connected to {}. Type :help for commands.", state.server_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_input(&line, &mut state, &dispatcher, &ui_sender).await {
                    break;
                }
            }
            event = ui_rx.recv() => {
                let Some(event) = event else { break };
                if let Some(channel_id) = followed_channel(&event, &state) {
                    enter_channel(&mut state, &dispatcher, &channel_id).await;
                }
                println!("{}", describe(&event));
            }
        }
    }

    println!("👋 Bye");
    Ok(())
}

/// Runs one line of input. Returns `false` when the console should exit.
pub async fn handle_input(
    line: &str,
    state: &mut ConsoleState,
    dispatcher: &Dispatcher,
    ui_sender: &mpsc::UnboundedSender<UIEvent>,
) -> bool {
    let say = |text: String| {
        if ui_sender.send(UIEvent::ChatMessage(text)).is_err() {
            debug!("UI receiver dropped, discarding console output");
        }
    };

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return true;
    }

    if line.starts_with('/') {
        let outcome = dispatcher
            .execute_command(
                &state.server_url,
                line,
                &state.channel_id,
                state.root_id.as_deref(),
            )
            .await;
        match outcome {
            Outcome::Success(CommandOutcome::Server(response)) => {
                if let Some(text) = response.text.as_deref().filter(|t| !t.is_empty()) {
                    say(text.to_string());
                }
                if let Some(location) = response.goto_location() {
                    let followed = dispatcher
                        .handle_goto_location(&state.server_url, location)
                        .await;
                    report_link(followed, &say);
                }
            }
            Outcome::Success(CommandOutcome::App(response)) => {
                if let Some(text) = response.text.as_deref().filter(|t| !t.is_empty()) {
                    say(format!("(only visible to you) {}", text));
                }
            }
            Outcome::SoftFailure(reason) => say(format!("⚠️ {}", reason)),
            Outcome::Error(e) => say(format!("❌ {}", e)),
        }
        return true;
    }

    let parts: Vec<&str> = line.trim().split_whitespace().collect();
    match parts[0] {
        ":quit" | ":q" => return false,
        ":help" => say(HELP.to_string()),
        ":go" => match parts.get(1) {
            Some(link) => {
                let outcome = dispatcher.handle_goto_location(&state.server_url, link).await;
                report_link(outcome, &say);
            }
            None => say("Usage: :go <link>".to_string()),
        },
        ":channel" => match parts.get(1) {
            Some(channel_id) => {
                enter_channel(state, dispatcher, channel_id).await;
                say(format!("✅ Now in channel {}", channel_id));
            }
            None => say(format!("Current channel: {}", state.channel_id)),
        },
        ":thread" => {
            state.root_id = parts.get(1).map(|id| id.to_string());
            match &state.root_id {
                Some(root_id) => say(format!("✅ Replying in thread {}", root_id)),
                None => say("✅ Left the thread".to_string()),
            }
        }
        ":commands" => {
            match dispatcher
                .fetch_commands(&state.server_url, &state.team_id)
                .await
            {
                Outcome::Success(commands) if commands.is_empty() => {
                    say("No commands available".to_string())
                }
                Outcome::Success(commands) => {
                    let listing = commands
                        .iter()
                        .map(|c| match c.auto_complete_hint.as_str() {
                            "" => format!("/{}", c.trigger),
                            hint => format!("/{} {}", c.trigger, hint),
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    say(listing);
                }
                Outcome::SoftFailure(reason) => say(format!("⚠️ {}", reason)),
                Outcome::Error(e) => say(format!("❌ {}", e)),
            }
        }
        ":suggest" => {
            let input = line.trim()[":suggest".len()..].trim_start();
            if input.is_empty() {
                say("Usage: :suggest <partial command>".to_string());
                return true;
            }
            match dispatcher
                .fetch_suggestions(
                    &state.server_url,
                    input,
                    &state.team_id,
                    &state.channel_id,
                    state.root_id.as_deref(),
                )
                .await
            {
                Outcome::Success(suggestions) => {
                    let listing = suggestions
                        .iter()
                        .map(|s| s.complete.clone())
                        .collect::<Vec<_>>()
                        .join("\n");
                    say(listing);
                }
                Outcome::SoftFailure(reason) => say(format!("⚠️ {}", reason)),
                Outcome::Error(e) => say(format!("❌ {}", e)),
            }
        }
        other => say(format!("Unknown command {}. Type :help for commands.", other)),
    }

    true
}

fn report_link(outcome: Outcome<LinkOutcome>, say: &impl Fn(String)) {
    match outcome {
        Outcome::Success(_) => {}
        Outcome::SoftFailure(reason) => say(format!("⚠️ {}", reason)),
        Outcome::Error(e) => say(format!("❌ {}", e)),
    }
}

/// Switches the console to `channel_id`, leaving any thread and picking up
/// the channel's team.
async fn enter_channel(state: &mut ConsoleState, dispatcher: &Dispatcher, channel_id: &str) {
    state.channel_id = channel_id.to_string();
    state.root_id = None;

    match dispatcher.resolve_team(&state.server_url, channel_id).await {
        Outcome::Success(team_id) => state.team_id = team_id,
        Outcome::SoftFailure(reason) => debug!("Keeping team {}: {}", state.team_id, reason),
        Outcome::Error(e) => warn!("Could not resolve team for channel {}: {}", channel_id, e),
    }
}

/// The channel navigation opened on the console's own server, if any.
fn followed_channel(event: &UIEvent, state: &ConsoleState) -> Option<String> {
    match event {
        UIEvent::ChannelOpened {
            server_url: server,
            channel_id,
            ..
        } if server_url::same_server(server, &state.server_url) => Some(channel_id.clone()),
        _ => None,
    }
}

/// Renders an event as one console line.
pub fn describe(event: &UIEvent) -> String {
    match event {
        UIEvent::ChannelOpened {
            server_url,
            channel_id,
            channel_name,
        } => format!(
            "➡️ Opened channel {} on {}",
            channel_name.as_deref().unwrap_or(channel_id),
            server_url
        ),
        UIEvent::PermalinkShown {
            team_name, post_id, ..
        } => format!("🔗 Post {} in team {}", post_id, team_name),
        UIEvent::DirectChannelOpened { display_name, .. } => {
            format!("➡️ Direct messages with {}", display_name)
        }
        UIEvent::AppFormShown { form, context } => {
            let title = form.title.as_deref().unwrap_or("Untitled form");
            let fields = form
                .fields
                .iter()
                .map(|f| f.label.clone().unwrap_or_else(|| f.name.clone()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("📝 {} from {} [{}]", title, context.app_id, fields)
        }
        UIEvent::PluginScreenShown { plugin_id, .. } => format!("🧩 Plugin {}", plugin_id),
        UIEvent::ExternalUrlOpened(url) => format!("🌐 {}", url),
        UIEvent::Alert { title, message } => format!("⚠️ {}: {}", title, message),
        UIEvent::ChatMessage(text) => text.clone(),
    }
}
