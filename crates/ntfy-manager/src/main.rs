mod bootstrap;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use ntfy_core::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::debug!(
        "ntfy-manager v{} using {}",
        env!("CARGO_PKG_VERSION"),
        settings.config.display()
    );

    let Some(command) = settings.command else {
        Settings::command().print_help()?;
        return Ok(());
    };

    let mut stdout = std::io::stdout();
    match commands::run(&settings.config, command, &mut stdout).await {
        Ok(succeeded) => {
            tracing::debug!(succeeded, "command finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal configuration error");
            println!("{}", commands::fatal_message(&e));
            std::process::exit(1);
        }
    }
}
