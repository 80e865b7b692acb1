//! Reading notifications back from the relay.

use std::io::Write;

use ntfy_core::error::{NtfyError, Result};
use ntfy_core::formatting::{format_message_line, format_topic_header};
use ntfy_core::models::{Config, RelayMessage};
use tracing::warn;

use crate::client::{decode_message, RelayClient};

/// How many of the cached messages a non-follow view prints per topic.
pub const RECENT_LIMIT: usize = 5;

/// Topics to read: the named repository's, or every registered one.
pub fn resolve_topics(config: &Config, repo: Option<&str>) -> Result<Vec<String>> {
    match repo {
        Some(name) => config
            .repository(name)
            .map(|r| vec![r.topic.clone()])
            .ok_or_else(|| NtfyError::RepoNotFound(name.to_string())),
        None => Ok(config
            .repositories
            .values()
            .map(|r| r.topic.clone())
            .collect()),
    }
}

/// The last `limit` entries of a JSON array body.
///
/// Anything other than an array yields nothing. Object entries are decoded
/// leniently; entries that are not objects are skipped.
pub fn latest_messages(body: serde_json::Value, limit: usize) -> Vec<RelayMessage> {
    let serde_json::Value::Array(items) = body else {
        return Vec::new();
    };
    let skip = items.len().saturating_sub(limit);
    items
        .into_iter()
        .skip(skip)
        .filter_map(decode_message)
        .collect()
}

/// Prints relay messages for one or all repositories.
pub struct Viewer {
    client: RelayClient,
}

impl Viewer {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(RelayClient::from_config(config))
    }

    /// Last [`RECENT_LIMIT`] messages cached for `topic`.
    pub async fn recent(&self, topic: &str) -> Result<Vec<RelayMessage>> {
        let body = self.client.fetch_json(topic).await?;
        Ok(latest_messages(body, RECENT_LIMIT))
    }

    /// Write the notifications of `repo` (or of every repository) to `out`.
    ///
    /// An unknown `repo` is an error and nothing is fetched. Failures on a
    /// single topic are written to `out` and the next topic is tried. In
    /// follow mode each topic's stream is read until the server closes it.
    ///
    /// Returns the number of messages written.
    pub async fn view<W: Write>(
        &self,
        config: &Config,
        repo: Option<&str>,
        follow: bool,
        out: &mut W,
    ) -> Result<usize> {
        let topics = resolve_topics(config, repo)?;
        let mut printed = 0;

        for topic in &topics {
            writeln!(out, "{}", format_topic_header(topic)).ok();

            let result = if follow {
                self.client
                    .stream(topic, |msg| {
                        writeln!(out, "{}", format_message_line(&msg)).ok();
                        out.flush().ok();
                    })
                    .await
            } else {
                self.recent(topic).await.map(|messages| {
                    for msg in &messages {
                        writeln!(out, "{}", format_message_line(msg)).ok();
                    }
                    messages.len()
                })
            };

            match result {
                Ok(n) => printed += n,
                Err(e) => {
                    warn!(topic = %topic, error = %e, "could not read notifications");
                    writeln!(out, "❌ Could not fetch {topic} notifications: {e}").ok();
                }
            }
        }

        Ok(printed)
    }
}
