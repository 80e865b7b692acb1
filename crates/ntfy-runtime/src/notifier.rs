//! Publishing a single notification.
//!
//! [`prepare`] applies the per-event policy and produces a [`Notification`]
//! without touching the network; [`Notifier::send`] publishes it.

use ntfy_core::error::{NtfyError, Result};
use ntfy_core::models::{Config, Priority};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info, warn};

use crate::client::RelayClient;

/// A fully composed publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Topic on the relay the notification is published to.
    pub topic: String,
    /// `{event title} - {display name}`.
    pub title: String,
    pub priority: Priority,
    /// The event name.
    pub tags: String,
    pub body: String,
}

impl Notification {
    /// Message headers as sent on the wire; the client adds authorisation.
    ///
    /// Header values are passed through as raw bytes so UTF-8 titles reach the
    /// relay unchanged; control characters are rejected.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("title"), header_value("Title", &self.title)?);
        headers.insert(
            HeaderName::from_static("priority"),
            HeaderValue::from_static(self.priority.as_str()),
        );
        headers.insert(HeaderName::from_static("tags"), header_value("Tags", &self.tags)?);
        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_bytes(value.as_bytes())
        .map_err(|e| NtfyError::NetworkFailure(format!("invalid {name} header: {e}")))
}

/// Apply the routing policy for `repo`/`event` and compose the request.
///
/// Fails without any I/O when the repository or event is unknown or the event
/// is disabled.
pub fn prepare(
    config: &Config,
    repo: &str,
    event: &str,
    message: &str,
    priority: Option<Priority>,
) -> Result<Notification> {
    let repo_config = config
        .repository(repo)
        .ok_or_else(|| NtfyError::RepoNotFound(repo.to_string()))?;

    let event_config = repo_config
        .events
        .get(event)
        .ok_or_else(|| NtfyError::EventNotFound {
            repo: repo.to_string(),
            event: event.to_string(),
        })?;

    if !event_config.enabled {
        return Err(NtfyError::EventDisabled {
            repo: repo.to_string(),
            event: event.to_string(),
        });
    }

    let display_name = repo_config.display_name(repo);
    Ok(Notification {
        topic: repo_config.topic.clone(),
        title: format!("{} - {display_name}", event_config.title),
        priority: priority.unwrap_or(event_config.priority),
        tags: event.to_string(),
        body: message.to_string(),
    })
}

/// Sends notifications through a [`RelayClient`].
pub struct Notifier {
    client: RelayClient,
}

impl Notifier {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(RelayClient::from_config(config))
    }

    /// Publish `message` for `repo`/`event`.
    ///
    /// Policy failures return before any request is made. A response other
    /// than 200 is [`NtfyError::UnexpectedResponseStatus`].
    pub async fn send(
        &self,
        config: &Config,
        repo: &str,
        event: &str,
        message: &str,
        priority: Option<Priority>,
    ) -> Result<()> {
        let notification = prepare(config, repo, event, message, priority)?;
        let headers = notification.headers()?;
        debug!(
            topic = %notification.topic,
            title = %notification.title,
            priority = %notification.priority,
            "publishing notification"
        );

        match self
            .client
            .publish(&notification.topic, headers, notification.body)
            .await
        {
            Ok(()) => {
                info!(repo, event, "notification sent");
                Ok(())
            }
            Err(e) => {
                warn!(repo, event, error = %e, "notification failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use ntfy_core::models::RepoConfig;

    fn config_with(server: &str) -> Config {
        let mut config = Config {
            default_server: server.to_string(),
            ..Config::default()
        };
        config
            .repositories
            .insert("webapp".to_string(), RepoConfig::new("repo-webapp", false));
        config.repositories.insert(
            "secret-project".to_string(),
            RepoConfig::new("repo-9f3c2a71", true),
        );
        config
    }

    // ── prepare ──────────────────────────────────────────────────────────

    #[test]
    fn test_prepare_public_repo() {
        let config = config_with("ntfy.sh");
        let n = prepare(&config, "webapp", "deploy", "v1.4 is live", None).unwrap();

        assert_eq!(n.topic, "repo-webapp");
        assert_eq!(n.title, "Deployment - webapp");
        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.tags, "deploy");
        assert_eq!(n.body, "v1.4 is live");
    }

    #[test]
    fn test_prepare_priority_override() {
        let config = config_with("ntfy.sh");
        let n = prepare(&config, "webapp", "build", "ok", Some(Priority::Urgent)).unwrap();
        assert_eq!(n.priority, Priority::Urgent);
    }

    #[test]
    fn test_prepare_private_repo_masks_name() {
        let config = config_with("ntfy.sh");
        let n = prepare(&config, "secret-project", "error", "boom", None).unwrap();

        assert_eq!(n.title, "Error Alert - Private-9f3c2a71");
        assert!(!n.title.contains("secret-project"));
        assert!(!n.topic.contains("secret-project"));
    }

    #[test]
    fn test_prepare_unknown_repo() {
        let config = config_with("ntfy.sh");
        let err = prepare(&config, "ghost", "build", "ok", None).unwrap_err();
        assert!(matches!(err, NtfyError::RepoNotFound(_)));
    }

    #[test]
    fn test_prepare_unknown_event() {
        let config = config_with("ntfy.sh");
        let err = prepare(&config, "webapp", "release", "ok", None).unwrap_err();
        assert!(matches!(err, NtfyError::EventNotFound { .. }));
    }

    #[test]
    fn test_prepare_disabled_event() {
        let config = config_with("ntfy.sh");
        let err = prepare(&config, "webapp", "test", "ok", None).unwrap_err();
        assert!(matches!(err, NtfyError::EventDisabled { .. }));
    }

    #[test]
    fn test_headers_accept_utf8_title() {
        let config = config_with("ntfy.sh");
        let mut n = prepare(&config, "webapp", "build", "ok", None).unwrap();
        n.title = "Derleme - çözücü".to_string();
        let headers = n.headers().unwrap();
        assert_eq!(headers["title"].as_bytes(), "Derleme - çözücü".as_bytes());
        assert_eq!(headers["priority"], "default");
        assert_eq!(headers["tags"], "build");
    }

    #[test]
    fn test_headers_reject_newline() {
        let config = config_with("ntfy.sh");
        let mut n = prepare(&config, "webapp", "build", "ok", None).unwrap();
        n.title = "line\nbreak".to_string();
        assert!(n.headers().is_err());
    }

    // ── send ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_posts_expected_request() {
        let (base, server) = serve_once(200, "{}").await;
        let mut config = config_with(&base);
        config.global_settings.auth_token = Some("tk_123".to_string());

        Notifier::from_config(&config)
            .send(&config, "secret-project", "deploy", "rolled out", Some(Priority::Low))
            .await
            .expect("send");

        let req = server.await.unwrap();
        assert_eq!(req.request_line, "POST /repo-9f3c2a71 HTTP/1.1");
        assert_eq!(req.header("title"), Some("Deployment - Private-9f3c2a71"));
        assert_eq!(req.header("priority"), Some("low"));
        assert_eq!(req.header("tags"), Some("deploy"));
        assert_eq!(req.header("authorization"), Some("Bearer tk_123"));
        assert_eq!(req.body, "rolled out");
        assert!(!req
            .headers
            .iter()
            .any(|(_, v)| v.contains("secret-project")));
    }

    #[tokio::test]
    async fn test_send_goes_to_notifier_client() {
        let (base, server) = serve_once(200, "{}").await;
        // The config points elsewhere; the client decides where requests go.
        let config = config_with("ntfy.invalid");
        let notifier = Notifier::new(RelayClient::new(base, None));

        notifier
            .send(&config, "webapp", "build", "green", None)
            .await
            .expect("send");

        let req = server.await.unwrap();
        assert_eq!(req.request_line, "POST /repo-webapp HTTP/1.1");
        assert!(req.header("authorization").is_none());
    }

    #[tokio::test]
    async fn test_send_non_200_is_failure() {
        let (base, server) = serve_once(429, r#"{"code":42901}"#).await;
        let config = config_with(&base);

        let err = Notifier::from_config(&config)
            .send(&config, "webapp", "build", "ok", None)
            .await
            .unwrap_err();

        assert!(matches!(err, NtfyError::UnexpectedResponseStatus(429)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_disabled_event_makes_no_request() {
        // Nothing listens here; a request would surface as NetworkFailure.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = config_with(&format!("http://{addr}"));

        let err = Notifier::from_config(&config)
            .send(&config, "webapp", "test", "ok", None)
            .await
            .unwrap_err();

        assert!(matches!(err, NtfyError::EventDisabled { .. }));
    }
}
