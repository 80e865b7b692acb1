//! Reading and writing the JSON config document.
//!
//! The file is loaded fresh on every invocation and written back after every
//! mutation. Each write goes through its own uniquely named temp file in the
//! same directory and a rename, so a reader never observes a half-written
//! document. Concurrent writers are not serialised: the last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{NtfyError, Result};
use crate::models::Config;

/// Config file name used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ntfy-manager.json";

/// A [`Config`] bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Load the config at `path`.
    ///
    /// Returns [`NtfyError::ConfigMissing`] when the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(NtfyError::ConfigMissing(path));
        }
        let config = read_config(&path)?;
        tracing::debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "config loaded"
        );
        Ok(Self { path, config })
    }

    /// Load the config at `path`, or start from [`Config::default`] and write
    /// it out when the file does not exist yet.
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(path);
        }
        tracing::info!(path = %path.display(), "config file absent; creating default");
        let store = Self {
            path,
            config: Config::default(),
        };
        store.save()?;
        Ok(store)
    }

    /// Wrap an in-memory config without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Persist the current config back to its path.
    pub fn save(&self) -> Result<()> {
        write_config(&self.path, &self.config)?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

// ── File I/O ──────────────────────────────────────────────────────────────────

/// Parse the config document at `path`.
pub fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| NtfyError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| NtfyError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically write `config` to `path` as pretty-printed UTF-8 JSON.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let write_err = |source| NtfyError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(write_err)?;
            parent
        }
        None => Path::new("."),
    };

    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
