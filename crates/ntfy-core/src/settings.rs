use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Priority;
use crate::store::DEFAULT_CONFIG_FILE;

/// Repository argument of `send` that stands for "the repository I'm in".
pub const AUTO_REPO: &str = "auto";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-repository notification routing for an ntfy relay
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ntfy-manager",
    about = "Per-repository notification routing for an ntfy relay",
    version
)]
pub struct Settings {
    /// Config file
    #[arg(long, global = true, env = "NTFY_MANAGER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Logging level
    #[arg(
        long,
        global = true,
        env = "NTFY_MANAGER_LOG",
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a repository
    #[command(name = "add-repo")]
    AddRepo {
        /// Repository name
        name: String,
        /// Relay topic (derived from the name when omitted)
        #[arg(long)]
        topic: Option<String>,
        /// Keep the repository name out of the topic and titles
        #[arg(long)]
        private: bool,
    },

    /// Switch an event on or off
    Toggle {
        /// Repository name
        repo: String,
        /// Event name
        event: String,
        /// Set enabled
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Set disabled
        #[arg(long)]
        disable: bool,
    },

    /// Send a notification
    Send {
        /// Repository name (or "auto" for the current git repository)
        repo: String,
        /// Event name
        event: String,
        /// Message body
        message: String,
        /// Priority override
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// List registered repositories
    List,

    /// Show recent notifications
    View {
        /// Only this repository
        #[arg(long)]
        repo: Option<String>,
        /// Keep streaming new notifications
        #[arg(long)]
        follow: bool,
    },
}

impl Command {
    /// Explicit state requested by `toggle --enable/--disable`, `None` to flip.
    pub fn toggle_state(enable: bool, disable: bool) -> Option<bool> {
        if enable {
            Some(true)
        } else if disable {
            Some(false)
        } else {
            None
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
