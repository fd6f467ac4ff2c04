use gigbook_db::AppState;
use gigbook_server::config::{ConfigError, ServerConfig};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sea_orm::DbErr),

    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sea_orm::DbErr),

    #[error("server error on {addr}: {source}")]
    Io {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let db_config = gigbook_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = gigbook_db::connect(&db_config)
        .await
        .map_err(StartupError::Connect)?;

    // Creates the tables on first start.
    tracing::info!("running database migrations...");
    gigbook_migration::Migrator::up(&db, None)
        .await
        .map_err(StartupError::Migrate)?;
    tracing::info!("migrations complete");

    let state = Arc::new(AppState {
        db,
        access_key: config.access_key.clone(),
    });

    let app = gigbook_server::build_router(state, &config.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Io { addr, source })?;
    tracing::info!(%addr, "server started");

    axum::serve(listener, app)
        .await
        .map_err(|source| StartupError::Io { addr, source })
}
