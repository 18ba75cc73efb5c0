//! Matches URLs against the in-app link patterns.
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::server_url;

/// An in-app destination encoded in a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Channel {
        team_name: String,
        channel_name: String,
    },
    Permalink {
        team_name: String,
        post_id: String,
    },
    DirectMessage {
        team_name: String,
        user_name: Option<String>,
    },
    GroupMessage {
        team_name: String,
        channel_id: Option<String>,
    },
    Plugin {
        id: String,
    },
}

impl DeepLink {
    pub fn kind(&self) -> &'static str {
        match self {
            DeepLink::Channel { .. } => "channel",
            DeepLink::Permalink { .. } => "permalink",
            DeepLink::DirectMessage { .. } => "dm",
            DeepLink::GroupMessage { .. } => "gm",
            DeepLink::Plugin { .. } => "plugin",
        }
    }
}

/// A matched link together with the server it points at.
///
/// `server_url` has no scheme; resolve it through the database registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkWithData {
    pub server_url: String,
    pub link: DeepLink,
}

pub trait DeepLinkMatcher: Send + Sync {
    /// Matches `link` for a user currently on `server_url`.
    ///
    /// `site_url` is the server's configured public URL, which may differ from
    /// the URL the client connected with.
    fn match_link(
        &self,
        link: &str,
        server_url: &str,
        site_url: Option<&str>,
    ) -> Option<DeepLinkWithData>;
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("deep link pattern is valid")
}

static PERMALINK: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(?P<server>.+?)/(?P<team>[^/]+)/pl/(?P<post>[a-z0-9]{26})$")
});
static CHANNEL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(?P<server>.+?)/(?P<team>[^/]+)/channels/(?P<channel>[^/]+)$")
});
static DIRECT_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(?P<server>.+?)/(?P<team>[^/]+)/messages/@(?P<user>[^/]*)$")
});
static GROUP_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(?P<server>.+?)/(?P<team>[^/]+)/messages(?:/(?P<channel>[a-z0-9]+))?$")
});
static PLUGIN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?P<server>.+?)/plugins/(?P<id>[^/]+)(?:/.*)?$"));

/// Matches `http(s)` links on known servers and links using the app's own scheme.
#[derive(Debug, Clone)]
pub struct UrlDeepLinkMatcher {
    custom_scheme: String,
}

impl Default for UrlDeepLinkMatcher {
    fn default() -> Self {
        Self::new("mattermost")
    }
}

impl UrlDeepLinkMatcher {
    pub fn new(custom_scheme: &str) -> Self {
        Self {
            custom_scheme: custom_scheme.to_lowercase(),
        }
    }

    /// Returns the scheme and the scheme-less `host[:port]/path` of `link`.
    ///
    /// Links without a host (`chat.example.com/..`, or `localhost:8065/..`
    /// which parses as scheme `localhost`) are read as `https`.
    fn location(link: &str) -> Option<(String, String)> {
        let url = Url::parse(link)
            .ok()
            .filter(|url| url.host_str().is_some())
            .or_else(|| Url::parse(&format!("https://{}", link)).ok())?;
        let host = url.host_str()?;
        let mut location = host.to_lowercase();
        if let Some(port) = url.port() {
            location.push_str(&format!(":{}", port));
        }
        location.push_str(url.path().trim_end_matches('/'));
        Some((url.scheme().to_string(), location))
    }
}

fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_location(location: &str) -> Option<(String, DeepLink)> {
    let server = |caps: &Captures<'_>| group(caps, "server").unwrap_or_default();
    let team = |caps: &Captures<'_>| group(caps, "team").unwrap_or_default();

    if let Some(caps) = PERMALINK.captures(location) {
        let link = DeepLink::Permalink {
            team_name: team(&caps),
            post_id: group(&caps, "post")?,
        };
        return Some((server(&caps), link));
    }
    if let Some(caps) = CHANNEL.captures(location) {
        let link = DeepLink::Channel {
            team_name: team(&caps),
            channel_name: group(&caps, "channel")?,
        };
        return Some((server(&caps), link));
    }
    if let Some(caps) = DIRECT_MESSAGE.captures(location) {
        let link = DeepLink::DirectMessage {
            team_name: team(&caps),
            user_name: group(&caps, "user"),
        };
        return Some((server(&caps), link));
    }
    if let Some(caps) = GROUP_MESSAGE.captures(location) {
        let link = DeepLink::GroupMessage {
            team_name: team(&caps),
            channel_id: group(&caps, "channel"),
        };
        return Some((server(&caps), link));
    }
    if let Some(caps) = PLUGIN.captures(location) {
        let link = DeepLink::Plugin {
            id: group(&caps, "id")?,
        };
        return Some((server(&caps), link));
    }

    None
}

impl DeepLinkMatcher for UrlDeepLinkMatcher {
    fn match_link(
        &self,
        link: &str,
        server_url: &str,
        site_url: Option<&str>,
    ) -> Option<DeepLinkWithData> {
        let (scheme, location) = Self::location(link)?;
        let (mut server, link) = parse_location(&location)?;

        let current = server_url::normalize(server_url);
        let aliased = site_url.is_some_and(|site| server_url::normalize(site) == server);
        if aliased {
            // The public site URL is another name for the current server.
            server = current;
        } else if scheme != self.custom_scheme && server != current {
            return None;
        }

        Some(DeepLinkWithData {
            server_url: server,
            link,
        })
    }
}
