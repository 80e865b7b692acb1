use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the notification manager.
#[derive(Error, Debug)]
pub enum NtfyError {
    /// The configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not a valid config document.
    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file could not be written back.
    #[error("Failed to write config file {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory configuration could not be serialised.
    #[error("Failed to serialise config: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No repository with this name is registered.
    #[error("Repository '{0}' not found")]
    RepoNotFound(String),

    /// The repository has no event with this name.
    #[error("Event '{event}' is not defined for '{repo}'")]
    EventNotFound { repo: String, event: String },

    /// The event exists but is switched off.
    #[error("{repo}/{event} is disabled - notification not sent")]
    EventDisabled { repo: String, event: String },

    /// The request never produced a response.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The relay answered with something other than 200.
    #[error("Unexpected response status: {0}")]
    UnexpectedResponseStatus(u16),

    /// The relay answered with a body that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// `auto` was requested but the working directory is not inside a git repository.
    #[error("Git repository not found")]
    AmbiguousAutoRepo,
}

impl NtfyError {
    /// Whether this error must terminate the process.
    ///
    /// Only failures around the config file itself are fatal; everything
    /// else is reported and the command returns normally.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NtfyError::ConfigMissing(_)
                | NtfyError::ConfigRead { .. }
                | NtfyError::ConfigParse { .. }
                | NtfyError::ConfigWrite { .. }
                | NtfyError::Serialize(_)
        )
    }

    /// Status marker printed in front of the message on stdout.
    pub fn marker(&self) -> &'static str {
        match self {
            NtfyError::EventDisabled { .. } => "⏭️ ",
            _ => "❌",
        }
    }
}

/// Convenience alias used throughout the ntfy crates.
pub type Result<T> = std::result::Result<T, NtfyError>;
