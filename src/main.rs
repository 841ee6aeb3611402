use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use users_api::config::AppConfig;
use users_api::database::{AccountStore, DatabaseManager, MemoryAccountStore, PgAccountStore};
use users_api::mail::build_mailer;
use users_api::{app, AppState};

#[derive(Parser)]
#[command(name = "users-api")]
#[command(about = "User account service: registration, verification, profile and password reset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Port to bind, overrides USERS_API_PORT / PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("users_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = users_api::config::config().clone();
    config.validate().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Users API in {:?} mode", config.environment);

    let store = open_store(&config).await?;
    let mailer = build_mailer(&config.mail).context("failed to build mailer")?;
    tracing::info!("Mail backend: {:?}", config.mail.backend);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(store, mailer, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Users API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn AccountStore>> {
    if config.database.url.is_some() {
        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;
        return Ok(Arc::new(PgAccountStore::new(pool)));
    }

    if config.is_development() {
        tracing::warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryAccountStore::new()));
    }

    bail!("DATABASE_URL must be set outside development")
}
