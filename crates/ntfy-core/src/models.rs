use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Server used when a fresh config file is bootstrapped.
pub const DEFAULT_SERVER: &str = "ntfy.sh";

/// Topic prefix used when a fresh config file is bootstrapped.
pub const DEFAULT_TOPIC_PREFIX: &str = "repo";

// ── Priority ──────────────────────────────────────────────────────────────────

/// Delivery prominence of a notification on the relay.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Default,
    High,
    Urgent,
}

impl Priority {
    /// Header value understood by the relay.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Default => "default",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EventConfig ───────────────────────────────────────────────────────────────

/// Per-event routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Whether notifications for this event are sent at all.
    pub enabled: bool,
    /// Priority used when the sender does not override it.
    pub priority: Priority,
    /// Human-readable title, prefixed to the display name in the `Title` header.
    pub title: String,
}

impl EventConfig {
    pub fn new(enabled: bool, priority: Priority, title: impl Into<String>) -> Self {
        Self {
            enabled,
            priority,
            title: title.into(),
        }
    }

    /// Record created for an event name seen for the first time.
    ///
    /// Priority is `default` and the title is the event name in title case.
    pub fn ad_hoc(name: &str, enabled: bool) -> Self {
        Self::new(enabled, Priority::Default, title_case(name))
    }
}

/// The four events every repository starts with.
pub fn default_events() -> BTreeMap<String, EventConfig> {
    [
        ("build", EventConfig::new(true, Priority::Default, "Build Status")),
        ("deploy", EventConfig::new(true, Priority::High, "Deployment")),
        ("test", EventConfig::new(false, Priority::Low, "Test Results")),
        ("error", EventConfig::new(true, Priority::Urgent, "Error Alert")),
    ]
    .into_iter()
    .map(|(name, cfg)| (name.to_string(), cfg))
    .collect()
}

// ── RepoConfig ────────────────────────────────────────────────────────────────

/// Routing configuration for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Relay topic messages for this repository are published to.
    pub topic: String,
    /// When set, the repository name is kept out of everything the relay sees.
    #[serde(default)]
    pub is_private: bool,
    /// Event name → policy.
    #[serde(default)]
    pub events: BTreeMap<String, EventConfig>,
}

impl RepoConfig {
    /// A repository routed to `topic` with the default event set.
    pub fn new(topic: impl Into<String>, is_private: bool) -> Self {
        Self {
            topic: topic.into(),
            is_private,
            events: default_events(),
        }
    }

    /// Name shown in notification titles.
    ///
    /// Private repositories show `Private-<last topic segment>` instead of
    /// their real name.
    pub fn display_name(&self, repo_name: &str) -> String {
        if self.is_private {
            let suffix = self.topic.rsplit('-').next().unwrap_or(&self.topic);
            format!("Private-{suffix}")
        } else {
            repo_name.to_string()
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Settings that apply to every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Bearer token sent with every relay request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// The whole on-disk configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Relay host (`ntfy.sh`) or base URL (`http://localhost:8080`).
    pub default_server: String,
    /// Prefix for generated topic names.
    pub default_topic_prefix: String,
    #[serde(default)]
    pub global_settings: GlobalSettings,
    /// Repository name → routing configuration.
    #[serde(default)]
    pub repositories: BTreeMap<String, RepoConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_server: DEFAULT_SERVER.to_string(),
            default_topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            global_settings: GlobalSettings::default(),
            repositories: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Base URL of the relay, without a trailing slash.
    ///
    /// A bare host is reached over HTTPS; a value that already carries a
    /// scheme is used verbatim.
    pub fn server_url(&self) -> String {
        let server = self.default_server.trim_end_matches('/');
        if server.starts_with("http://") || server.starts_with("https://") {
            server.to_string()
        } else {
            format!("https://{server}")
        }
    }

    /// Configured bearer token, if any. Empty strings count as unset.
    pub fn auth_token(&self) -> Option<&str> {
        self.global_settings
            .auth_token
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    pub fn repository(&self, name: &str) -> Option<&RepoConfig> {
        self.repositories.get(name)
    }
}

// ── RelayMessage ──────────────────────────────────────────────────────────────

/// When a relay message was published.
///
/// The relay sends Unix seconds; anything else is kept as raw text so it can
/// still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayTime {
    Unix(i64),
    Raw(String),
}

impl From<serde_json::Value> for RelayTime {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(secs) => RelayTime::Unix(secs),
                None => RelayTime::Raw(n.to_string()),
            },
            serde_json::Value::String(s) => RelayTime::Raw(s),
            other => RelayTime::Raw(other.to_string()),
        }
    }
}

/// One object from the relay's JSON endpoints.
///
/// Every field is optional and decoded on its own: a field with an unexpected
/// type becomes `None` (or raw text for `time`) instead of rejecting the whole
/// object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub time: Option<RelayTime>,
    /// `message`, `open`, `keepalive`, ...
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
}

impl RelayMessage {
    /// Relay bookkeeping frames (`open`, `keepalive`, ...) carry no message.
    pub fn is_bookkeeping(&self) -> bool {
        matches!(self.event.as_deref(), Some(e) if e != "message")
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_time<'de, D>(deserializer: D) -> std::result::Result<Option<RelayTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(RelayTime::from))
}

// Numeric priorities sometimes arrive quoted.
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|p| u8::try_from(p).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
///
/// ```
/// use ntfy_core::models::title_case;
///
/// assert_eq!(title_case("release"), "Release");
/// assert_eq!(title_case("code-review"), "Code-Review");
/// assert_eq!(title_case("LINT_check"), "Lint_Check");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
