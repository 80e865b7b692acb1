//! Repository registration and per-event switches.
//!
//! Every mutating operation persists the store before returning.

use md5::{Digest, Md5};

use crate::error::{NtfyError, Result};
use crate::models::{EventConfig, RepoConfig};
use crate::store::ConfigStore;

/// Number of hex characters kept from the name digest of a private repository.
pub const PRIVATE_TOPIC_HASH_LEN: usize = 8;

/// Mutating view over a loaded [`ConfigStore`].
pub struct Registry<'a> {
    store: &'a mut ConfigStore,
}

impl<'a> Registry<'a> {
    pub fn new(store: &'a mut ConfigStore) -> Self {
        Self { store }
    }

    /// Register `name` (or replace its existing entry) and persist.
    ///
    /// Without an explicit `topic` the topic is derived from the configured
    /// prefix, see [`derive_topic`]. Returns the topic in use.
    pub fn add_repository(
        &mut self,
        name: &str,
        topic: Option<&str>,
        is_private: bool,
    ) -> Result<String> {
        let config = self.store.config_mut();
        let topic = match topic {
            Some(t) => t.to_string(),
            None => derive_topic(&config.default_topic_prefix, name, is_private),
        };

        let previous = config
            .repositories
            .insert(name.to_string(), RepoConfig::new(topic.clone(), is_private));
        if previous.is_some() {
            tracing::warn!(repo = name, "repository already registered; configuration replaced");
        }

        self.store.save()?;
        tracing::info!(repo = name, topic = %topic, is_private, "repository added");
        Ok(topic)
    }

    /// Switch `event` of `repo` on or off and persist.
    ///
    /// * unknown repository → [`NtfyError::RepoNotFound`], nothing is written
    /// * unknown event → created with `enabled.unwrap_or(true)`
    /// * known event, `enabled` is `None` → flipped
    /// * known event, `enabled` is `Some(v)` → set to `v`
    ///
    /// Returns the resulting state of the event.
    pub fn toggle_event(&mut self, repo: &str, event: &str, enabled: Option<bool>) -> Result<bool> {
        let repo_config = self
            .store
            .config_mut()
            .repositories
            .get_mut(repo)
            .ok_or_else(|| NtfyError::RepoNotFound(repo.to_string()))?;

        let state = match repo_config.events.get_mut(event) {
            Some(existing) => {
                existing.enabled = enabled.unwrap_or(!existing.enabled);
                existing.enabled
            }
            None => {
                let created = EventConfig::ad_hoc(event, enabled.unwrap_or(true));
                let state = created.enabled;
                repo_config.events.insert(event.to_string(), created);
                tracing::debug!(repo, event, "new event created");
                state
            }
        };

        self.store.save()?;
        tracing::info!(repo, event, enabled = state, "event toggled");
        Ok(state)
    }
}

// ── Topic derivation ──────────────────────────────────────────────────────────

/// Topic for a repository registered without an explicit one.
///
/// Public repositories use `{prefix}-{name}`; private ones use
/// `{prefix}-{hash}` so the name never appears on the relay.
///
/// ```
/// use ntfy_core::registry::derive_topic;
///
/// assert_eq!(derive_topic("repo", "webapp", false), "repo-webapp");
/// assert_eq!(derive_topic("repo", "webapp", true).len(), "repo-".len() + 8);
/// ```
pub fn derive_topic(prefix: &str, name: &str, is_private: bool) -> String {
    if is_private {
        format!("{prefix}-{}", name_digest(name))
    } else {
        format!("{prefix}-{name}")
    }
}

/// First [`PRIVATE_TOPIC_HASH_LEN`] lower-case hex characters of the MD5 of `name`.
pub fn name_digest(name: &str) -> String {
    let hex = format!("{:x}", Md5::digest(name.as_bytes()));
    hex[..PRIVATE_TOPIC_HASH_LEN].to_string()
}
