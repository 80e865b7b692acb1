//! Human-readable rendering of the registry and of relay messages.

use chrono::{DateTime, Utc};

use crate::models::{Config, RelayMessage, RelayTime};

/// Render every registered repository with its events.
///
/// ```
/// use ntfy_core::formatting::format_repository_list;
/// use ntfy_core::models::{Config, RepoConfig};
///
/// let mut config = Config::default();
/// config
///     .repositories
///     .insert("webapp".to_string(), RepoConfig::new("repo-webapp", false));
///
/// let out = format_repository_list(&config);
/// assert!(out.contains("🔗 webapp (topic: repo-webapp)"));
/// assert!(out.contains("  ❌ test (priority: low)"));
/// ```
pub fn format_repository_list(config: &Config) -> String {
    let mut out = String::from("📋 Registered repositories:\n");
    for (name, repo) in &config.repositories {
        let private = if repo.is_private { " [private]" } else { "" };
        out.push_str(&format!("\n🔗 {name} (topic: {}){private}\n", repo.topic));
        for (event, cfg) in &repo.events {
            let status = if cfg.enabled { "✅" } else { "❌" };
            out.push_str(&format!(
                "  {status} {event} (priority: {})\n",
                cfg.priority
            ));
        }
    }
    out
}

/// Render a Unix timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Out-of-range values fall back to the raw number.
///
/// ```
/// use ntfy_core::formatting::format_timestamp;
///
/// assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
/// assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
/// ```
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}

/// Render a relay timestamp; non-integer values are shown as sent.
pub fn format_relay_time(time: &RelayTime) -> String {
    match time {
        RelayTime::Unix(secs) => format_timestamp(*secs),
        RelayTime::Raw(text) => text.clone(),
    }
}

/// One line of viewer output: `  [timestamp] message`.
pub fn format_message_line(msg: &RelayMessage) -> String {
    let time = msg.time.as_ref().map(format_relay_time).unwrap_or_default();
    let body = msg.message.as_deref().unwrap_or_default();
    format!("  [{time}] {body}")
}

/// Header printed before the messages of a topic.
pub fn format_topic_header(topic: &str) -> String {
    format!("📱 {topic} notifications:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoConfig;

    #[test]
    fn test_format_empty_list() {
        let out = format_repository_list(&Config::default());
        assert_eq!(out, "📋 Registered repositories:\n");
    }

    #[test]
    fn test_format_list_marks_private_and_orders_events() {
        let mut config = Config::default();
        config
            .repositories
            .insert("secret".to_string(), RepoConfig::new("repo-5ebe2294", true));

        let out = format_repository_list(&config);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[2], "🔗 secret (topic: repo-5ebe2294) [private]");
        assert_eq!(
            &lines[3..],
            &[
                "  ✅ build (priority: default)",
                "  ✅ deploy (priority: high)",
                "  ✅ error (priority: urgent)",
                "  ❌ test (priority: low)",
            ]
        );
    }

    #[test]
    fn test_format_message_line_with_time() {
        let msg = RelayMessage {
            time: Some(RelayTime::Unix(1_700_000_000)),
            message: Some("deploy finished".to_string()),
            ..Default::default()
        };
        assert_eq!(format_message_line(&msg), "  [2023-11-14 22:13:20] deploy finished");
    }

    #[test]
    fn test_format_message_line_missing_fields() {
        assert_eq!(format_message_line(&RelayMessage::default()), "  [] ");
    }

    #[test]
    fn test_format_message_line_raw_time() {
        let msg = RelayMessage {
            time: Some(RelayTime::Raw("now".to_string())),
            message: Some("hello".to_string()),
            ..Default::default()
        };
        assert_eq!(format_message_line(&msg), "  [now] hello");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
