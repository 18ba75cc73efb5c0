//! Recognises app commands and turns them into submit calls.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::i18n::{messages, Localizer};
use crate::server_url;

use super::types::{AppBinding, AppCallRequest, AppContext};

/// Where a command was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScope {
    pub server_url: String,
    pub channel_id: String,
    pub team_id: String,
    pub root_id: Option<String>,
}

#[async_trait]
pub trait AppCommandParser: Send + Sync {
    /// Whether `message` addresses a registered app command.
    async fn is_app_command(&self, scope: &CommandScope, message: &str) -> bool;

    /// Builds the submit call for `message`.
    ///
    /// The error is a user-facing explanation of why the command is incomplete
    /// or malformed.
    async fn compose_submit_call(
        &self,
        scope: &CommandScope,
        message: &str,
    ) -> Result<AppCallRequest, String>;
}

/// Parses commands against bindings registered per server.
pub struct BindingParser {
    bindings: RwLock<HashMap<String, Vec<AppBinding>>>,
    localizer: Arc<dyn Localizer>,
}

impl BindingParser {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            localizer,
        }
    }

    /// Replaces the command bindings known for `server_url`.
    pub fn set_bindings(&self, server_url: &str, bindings: Vec<AppBinding>) {
        if let Ok(mut all) = self.bindings.write() {
            all.insert(server_url::normalize(server_url), bindings);
        }
    }

    fn find_top_level(&self, server_url: &str, trigger: &str) -> Option<AppBinding> {
        let all = self.bindings.read().ok()?;
        all.get(&server_url::normalize(server_url))?
            .iter()
            .find(|b| b.label.eq_ignore_ascii_case(trigger))
            .cloned()
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Flag(String),
}

fn flag_name(word: &str) -> Option<&str> {
    word.strip_prefix("--")
        .or_else(|| word.strip_prefix('\u{2014}'))
        .filter(|name| !name.is_empty())
}

/// Splits `input` on whitespace, keeping double-quoted runs together.
///
/// Returns `None` if a quote is left open.
fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' if chars.peek() == Some(&'"') => {
                        value.push('"');
                        chars.next();
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            if !closed {
                return None;
            }
            tokens.push(Token::Word(value));
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            chars.next();
        }

        match flag_name(&word) {
            Some(name) => tokens.push(Token::Flag(name.to_string())),
            None => tokens.push(Token::Word(word)),
        }
    }

    Some(tokens)
}

#[async_trait]
impl AppCommandParser for BindingParser {
    async fn is_app_command(&self, scope: &CommandScope, message: &str) -> bool {
        let Some(first) = message.split_whitespace().next() else {
            return false;
        };
        match first.strip_prefix('/') {
            Some(trigger) => self.find_top_level(&scope.server_url, trigger).is_some(),
            None => false,
        }
    }

    async fn compose_submit_call(
        &self,
        scope: &CommandScope,
        message: &str,
    ) -> Result<AppCallRequest, String> {
        let tokens = tokenize(message)
            .ok_or_else(|| self.localizer.text(&messages::APPS_UNTERMINATED_QUOTE))?;
        let mut tokens = tokens.into_iter().peekable();

        let trigger = match tokens.next() {
            Some(Token::Word(word)) => word.strip_prefix('/').map(str::to_string),
            _ => None,
        };
        let mut binding = trigger
            .and_then(|t| self.find_top_level(&scope.server_url, &t))
            .ok_or_else(|| self.localizer.text(&messages::APPS_NOT_FOUND))?;
        let mut path = vec![binding.label.clone()];

        while let Some(Token::Word(word)) = tokens.peek() {
            let Some(child) = binding
                .bindings
                .iter()
                .find(|b| b.label.eq_ignore_ascii_case(word))
                .cloned()
            else {
                break;
            };
            path.push(child.label.clone());
            binding = child;
            tokens.next();
        }

        let Some(submit) = binding.submit.as_ref() else {
            let command = format!("/{}", path.join(" "));
            let options: Vec<&str> = binding.bindings.iter().map(|b| b.label.as_str()).collect();
            let options = options.join(", ");
            return Err(self.localizer.format(
                &messages::APPS_NO_SUBMIT,
                &[("command", command.as_str()), ("options", options.as_str())],
            ));
        };

        let context = AppContext {
            app_id: binding.app_id.clone(),
            location: Some(
                binding
                    .location
                    .clone()
                    .unwrap_or_else(|| format!("/command/{}", path.join("/"))),
            ),
            channel_id: scope.channel_id.clone(),
            team_id: scope.team_id.clone(),
            root_id: scope.root_id.clone(),
        };
        let mut call = AppCallRequest::new(submit, context);
        call.raw_command = Some(message.to_string());

        let mut position = 0;
        while let Some(token) = tokens.next() {
            match token {
                Token::Flag(name) => match tokens.next() {
                    Some(Token::Word(value)) => {
                        call.values.insert(name, value);
                    }
                    _ => {
                        return Err(self
                            .localizer
                            .format(&messages::APPS_MISSING_VALUE, &[("name", name.as_str())]));
                    }
                },
                Token::Word(value) => {
                    position += 1;
                    call.values.insert(format!("arg{}", position), value);
                }
            }
        }

        Ok(call)
    }
}
