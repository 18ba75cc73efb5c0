//! Error types shared by the command and deep-link pipelines.
use thiserror::Error;

/// A failure reported by a network client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// An app call that did not produce a usable response.
///
/// `text` carries the server or app supplied explanation, when there is one.
#[derive(Debug, Clone, Error, PartialEq, Default)]
#[error("{}", .text.as_deref().unwrap_or("app call failed"))]
pub struct AppCallFailure {
    pub text: Option<String>,
}

impl AppCallFailure {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Returns the failure text if it is non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Hard errors surfaced by the dispatcher.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("{0} database not found")]
    DatabaseNotFound(String),
    #[error("{0} client not found")]
    ClientNotFound(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A user-facing message produced by the app pipeline.
    #[error("{0}")]
    App(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Storage(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_names_the_server() {
        let err = DispatchError::DatabaseNotFound("https://chat.example.com".into());
        assert_eq!(err.to_string(), "https://chat.example.com database not found");
    }

    #[test]
    fn app_call_failure_ignores_empty_text() {
        assert!(AppCallFailure::new("").text().is_none());
        assert_eq!(AppCallFailure::default().to_string(), "app call failed");
        assert_eq!(AppCallFailure::new("nope").to_string(), "nope");
    }
}
