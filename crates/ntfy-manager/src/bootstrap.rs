use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// Diagnostics go to stderr so they never mix with command output on stdout.
/// `log_level` is used as an [`EnvFilter`] directive; an unparsable value
/// falls back to `"warn"`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = build_filter(log_level);

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("warn"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
