//! Network and process side of ntfy-manager.
//!
//! Publishes notifications to the relay, reads them back (once or as a
//! stream) and resolves the repository of the working directory.

pub mod client;
pub mod notifier;
pub mod repo_detect;
pub mod viewer;

#[cfg(test)]
mod test_support;
