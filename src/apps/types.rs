use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an app call originated and which app it targets.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppContext {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub channel_id: String,
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
}

/// The part of a binding that says what to call.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppCall {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
}

/// A call ready to be submitted to the apps framework.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppCallRequest {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
    pub context: AppContext,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_command: Option<String>,
}

impl AppCallRequest {
    pub fn new(call: &AppCall, context: AppContext) -> Self {
        Self {
            path: call.path.clone(),
            expand: call.expand.clone(),
            state: call.state.clone(),
            context,
            values: BTreeMap::new(),
            raw_command: None,
        }
    }
}

/// The type tag of an app call response.
///
/// Tags this crate does not know are kept verbatim in `Other`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum AppCallResponseType {
    Ok,
    Form,
    Call,
    Navigate,
    Error,
    Other(String),
}

impl AppCallResponseType {
    pub fn as_str(&self) -> &str {
        match self {
            AppCallResponseType::Ok => "ok",
            AppCallResponseType::Form => "form",
            AppCallResponseType::Call => "call",
            AppCallResponseType::Navigate => "navigate",
            AppCallResponseType::Error => "error",
            AppCallResponseType::Other(tag) => tag,
        }
    }
}

impl From<String> for AppCallResponseType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ok" => AppCallResponseType::Ok,
            "form" => AppCallResponseType::Form,
            "call" => AppCallResponseType::Call,
            "navigate" => AppCallResponseType::Navigate,
            "error" => AppCallResponseType::Error,
            _ => AppCallResponseType::Other(tag),
        }
    }
}

impl From<AppCallResponseType> for String {
    fn from(tag: AppCallResponseType) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for AppCallResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppCallResponse {
    #[serde(rename = "type")]
    pub response_type: AppCallResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<AppForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_to_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl AppCallResponse {
    pub fn ok<S: Into<String>>(text: S) -> Self {
        Self {
            response_type: AppCallResponseType::Ok,
            text: Some(text.into()),
            form: None,
            navigate_to_url: None,
            data: None,
        }
    }

    pub fn with_type(response_type: AppCallResponseType) -> Self {
        Self {
            response_type,
            text: None,
            form: None,
            navigate_to_url: None,
            data: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub fields: Vec<AppField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<AppCall>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// A node in an app's command tree.
///
/// Top-level bindings are reached with `/<label>`, children by the following
/// words. Only bindings carrying `submit` can be executed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppBinding {
    pub app_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<AppCall>,
    #[serde(default)]
    pub bindings: Vec<AppBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_response_types_are_preserved() {
        let resp: AppCallResponse =
            serde_json::from_str(r#"{"type":"modal","text":"x"}"#).unwrap();
        assert_eq!(resp.response_type, AppCallResponseType::Other("modal".into()));
        assert_eq!(resp.response_type.to_string(), "modal");

        let known: AppCallResponse = serde_json::from_str(r#"{"type":"navigate"}"#).unwrap();
        assert_eq!(known.response_type, AppCallResponseType::Navigate);
        assert!(known.navigate_to_url.is_none());
    }
}
