use std::path::PathBuf;

use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "dashboard", version)]
#[command(about = "Personal dashboard backend")]
struct Cli {
    /// Settings file (also read from `DASHBOARD_CONFIG`).
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Remove monthly instances whose template no longer exists.
    CleanupOrphans {
        #[arg(long, default_value = "default-user")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dashboard={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let bind = settings
                .server
                .bind
                .unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, settings.server.port);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            let options = server::ServeOptions {
                cors: settings.server.cors,
            };
            server::run_with_listener(engine, db, listener, options).await?;
        }
        Command::CleanupOrphans { user } => {
            let cleanup = engine.cleanup_orphaned_instances(&user).await?;
            for (month_key, removed) in &cleanup.removed {
                tracing::info!(month_key = %month_key, removed, "orphaned instances removed");
            }
            println!(
                "Removed {} orphaned instances across {} months",
                cleanup.total(),
                cleanup.removed.len()
            );
        }
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
