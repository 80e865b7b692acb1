//! Resolving the repository that contains the working directory.
//!
//! Backs `send auto ...`: the repository name is the basename of
//! `git rev-parse --show-toplevel`.

use std::path::Path;

use ntfy_core::error::{NtfyError, Result};
use tokio::process::Command;
use tracing::debug;

/// Name of the git repository containing `dir`.
///
/// A missing `git` binary, a non-zero exit or empty output all mean the
/// repository cannot be determined.
pub async fn repository_at(dir: &Path) -> Result<String> {
    let output = match Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "failed to run git");
            return Err(NtfyError::AmbiguousAutoRepo);
        }
    };

    if !output.status.success() {
        debug!(
            code = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git rev-parse failed"
        );
        return Err(NtfyError::AmbiguousAutoRepo);
    }

    let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
    repository_name(&toplevel).ok_or(NtfyError::AmbiguousAutoRepo)
}

/// Last path component of a repository root.
fn repository_name(toplevel: &str) -> Option<String> {
    Path::new(toplevel)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}
