//! Command handlers.
//!
//! Each handler loads the config fresh, performs its operation and writes the
//! outcome to `out`. Only config-file failures escape as errors; everything
//! else is printed with a status marker and reported as `Ok(false)`.

use std::io::Write;
use std::path::{Path, PathBuf};

use ntfy_core::error::{NtfyError, Result};
use ntfy_core::formatting::format_repository_list;
use ntfy_core::models::Priority;
use ntfy_core::registry::Registry;
use ntfy_core::settings::{Command, AUTO_REPO};
use ntfy_core::store::ConfigStore;
use ntfy_runtime::notifier::Notifier;
use ntfy_runtime::repo_detect;
use ntfy_runtime::viewer::Viewer;

/// Run `command` against the config at `config_path`.
///
/// Returns whether the command succeeded.
pub async fn run<W: Write>(config_path: &Path, command: Command, out: &mut W) -> Result<bool> {
    let workdir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    run_in(config_path, &workdir, command, out).await
}

/// [`run`] with `send auto` resolved against `workdir`.
pub async fn run_in<W: Write>(
    config_path: &Path,
    workdir: &Path,
    command: Command,
    out: &mut W,
) -> Result<bool> {
    let outcome = match command {
        Command::AddRepo {
            name,
            topic,
            private,
        } => add_repo(config_path, &name, topic.as_deref(), private, out),
        Command::Toggle {
            repo,
            event,
            enable,
            disable,
        } => toggle(
            config_path,
            &repo,
            &event,
            Command::toggle_state(enable, disable),
            out,
        ),
        Command::Send {
            repo,
            event,
            message,
            priority,
        } => send(config_path, workdir, &repo, &event, &message, priority, out).await,
        Command::List => list(config_path, out),
        Command::View { repo, follow } => view(config_path, repo.as_deref(), follow, out).await,
    };

    match outcome {
        Ok(()) => Ok(true),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            writeln!(out, "{} {e}", e.marker()).ok();
            Ok(false)
        }
    }
}

fn add_repo<W: Write>(
    config_path: &Path,
    name: &str,
    topic: Option<&str>,
    private: bool,
    out: &mut W,
) -> Result<()> {
    let mut store = ConfigStore::load_or_init(config_path)?;
    let topic = Registry::new(&mut store).add_repository(name, topic, private)?;
    writeln!(out, "✅ Repository '{name}' added (topic: {topic})").ok();
    Ok(())
}

fn toggle<W: Write>(
    config_path: &Path,
    repo: &str,
    event: &str,
    enabled: Option<bool>,
    out: &mut W,
) -> Result<()> {
    let mut store = ConfigStore::load(config_path)?;
    let state = Registry::new(&mut store).toggle_event(repo, event, enabled)?;
    let status = if state { "enabled" } else { "disabled" };
    writeln!(out, "✅ {repo}/{event} {status}").ok();
    Ok(())
}

async fn send<W: Write>(
    config_path: &Path,
    workdir: &Path,
    repo: &str,
    event: &str,
    message: &str,
    priority: Option<Priority>,
    out: &mut W,
) -> Result<()> {
    let store = ConfigStore::load(config_path)?;
    let repo = if repo == AUTO_REPO {
        let detected = repo_detect::repository_at(workdir).await?;
        tracing::info!(repo = %detected, "resolved current repository");
        detected
    } else {
        repo.to_string()
    };

    let config = store.config();
    Notifier::from_config(config)
        .send(config, &repo, event, message, priority)
        .await?;
    writeln!(out, "✅ Notification sent: {repo}/{event}").ok();
    Ok(())
}

fn list<W: Write>(config_path: &Path, out: &mut W) -> Result<()> {
    let store = ConfigStore::load(config_path)?;
    write!(out, "{}", format_repository_list(store.config())).ok();
    Ok(())
}

async fn view<W: Write>(
    config_path: &Path,
    repo: Option<&str>,
    follow: bool,
    out: &mut W,
) -> Result<()> {
    let store = ConfigStore::load(config_path)?;
    let config = store.config();
    Viewer::from_config(config)
        .view(config, repo, follow, out)
        .await
        .map(|_| ())
}

/// Message printed for a fatal error before the process exits.
pub fn fatal_message(err: &NtfyError) -> String {
    format!("❌ {err}")
}
