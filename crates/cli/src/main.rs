//! `library` command: serve the catalog, apply migrations, or show settings.

use anyhow::Context;
use clap::{Parser, Subcommand};
use library_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "library", version, about = "Local library catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until SIGINT or SIGTERM
    Serve,
    /// Create the store indexes declared by every module
    Migrate,
    /// Print the resolved settings
    Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load library settings")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        match cli.command {
            Command::Serve => library_app::bootstrap::run(settings).await,
            Command::Migrate => {
                library_telemetry::init(&settings.telemetry);
                let applied = library_app::bootstrap::migrate(&settings).await?;
                tracing::info!(applied, "migrations applied");
                println!("applied {applied} migrations");
                Ok(())
            }
            Command::Settings => {
                println!("{settings:#?}");
                Ok(())
            }
        }
    })
}
