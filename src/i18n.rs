//! User-facing strings and the localization seam.
use std::collections::HashMap;

/// A translatable message: a stable id plus the English default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub id: &'static str,
    pub default_message: &'static str,
}

pub mod messages {
    use super::MessageDescriptor;

    pub const APPS_UNKNOWN_ERROR: MessageDescriptor = MessageDescriptor {
        id: "apps.error.unknown",
        default_message: "Unknown error occurred.",
    };
    pub const APPS_UNKNOWN_RESPONSE_TYPE: MessageDescriptor = MessageDescriptor {
        id: "apps.error.responses.unknown_type",
        default_message: "App response type not supported. Response type: {type}.",
    };
    pub const APPS_NOT_FOUND: MessageDescriptor = MessageDescriptor {
        id: "apps.error.parser.no_bindings",
        default_message: "No command bindings.",
    };
    pub const APPS_NO_SUBMIT: MessageDescriptor = MessageDescriptor {
        id: "apps.error.parser.no_submit",
        default_message: "`{command}` is not a complete command. Try one of: {options}.",
    };
    pub const APPS_UNTERMINATED_QUOTE: MessageDescriptor = MessageDescriptor {
        id: "apps.error.parser.missing_quote",
        default_message: "Matching double quote expected before end of input.",
    };
    pub const APPS_MISSING_VALUE: MessageDescriptor = MessageDescriptor {
        id: "apps.error.parser.missing_value",
        default_message: "Missing value for `--{name}`.",
    };
    pub const LINK_ERROR_TITLE: MessageDescriptor = MessageDescriptor {
        id: "mobile.server_link.error.title",
        default_message: "Link Error",
    };
    pub const LINK_NOT_FOUND: MessageDescriptor = MessageDescriptor {
        id: "mobile.server_link.error.text",
        default_message: "The link could not be found on this server.",
    };
    pub const LINK_BAD_CHANNEL: MessageDescriptor = MessageDescriptor {
        id: "mobile.server_link.unreachable_channel.error",
        default_message:
            "This link belongs to a deleted channel or to a channel to which you do not have access.",
    };
    pub const LINK_UNKNOWN_USER: MessageDescriptor = MessageDescriptor {
        id: "mobile.server_link.unreachable_user.error",
        default_message: "This link belongs to a deleted user.",
    };
}

/// Formats user-facing strings.
pub trait Localizer: Send + Sync {
    /// Formats `message`, substituting `{name}` placeholders from `values`.
    fn format(&self, message: &MessageDescriptor, values: &[(&str, &str)]) -> String;

    fn text(&self, message: &MessageDescriptor) -> String {
        self.format(message, &[])
    }
}

/// English defaults, optionally overridden per message id.
#[derive(Debug, Default, Clone)]
pub struct DefaultLocalizer {
    overrides: HashMap<String, String>,
}

impl DefaultLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl Localizer for DefaultLocalizer {
    fn format(&self, message: &MessageDescriptor, values: &[(&str, &str)]) -> String {
        let template = self
            .overrides
            .get(message.id)
            .map(String::as_str)
            .unwrap_or(message.default_message);

        values
            .iter()
            .fold(template.to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_placeholders() {
        let l10n = DefaultLocalizer::new();
        assert_eq!(
            l10n.format(&messages::APPS_UNKNOWN_RESPONSE_TYPE, &[("type", "modal")]),
            "App response type not supported. Response type: modal."
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("mobile.server_link.error.title".to_string(), "Lien".to_string());
        let l10n = DefaultLocalizer::with_overrides(overrides);
        assert_eq!(l10n.text(&messages::LINK_ERROR_TITLE), "Lien");
        assert_eq!(l10n.text(&messages::LINK_NOT_FOUND), messages::LINK_NOT_FOUND.default_message);
    }
}
