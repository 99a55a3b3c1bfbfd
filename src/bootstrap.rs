use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    application::user_service::{EventPublisher, UserService},
    config::{AppConfig, LogConfig, LogFormat, StorageBackend},
    domain::user::UserRepository,
    infrastructure::{
        kafka::UserEventProducer,
        memory::{InMemoryUserRepository, LogEventPublisher},
        postgres::{build_pg_pool, repositories::PgUserRepository},
    },
    interfaces::http::router::build_router,
    state::{AppState, SharedState},
};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load()?);
    init_tracing(&config.log);

    let state = build_state(config.clone()).await?;

    let router: Router = build_router(state);
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wires repository and publisher for the configured backend into the service graph.
pub async fn build_state(config: Arc<AppConfig>) -> anyhow::Result<SharedState> {
    let (repo, publisher): (Arc<dyn UserRepository>, Arc<dyn EventPublisher>) =
        match config.storage.backend {
            StorageBackend::Postgres => {
                let pg_pool = build_pg_pool(&config.postgres).await?;
                let repo: Arc<dyn UserRepository> =
                    Arc::new(PgUserRepository::new(pg_pool, &config.postgres.table));
                let publisher: Arc<dyn EventPublisher> =
                    Arc::new(UserEventProducer::new(&config.kafka)?);
                info!(
                    table = %config.postgres.table,
                    topic = %config.kafka.topic,
                    "using postgres store and kafka publisher"
                );
                (repo, publisher)
            }
            StorageBackend::Memory => {
                warn!("using in-memory store; records are lost on restart");
                let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
                let publisher: Arc<dyn EventPublisher> = Arc::new(LogEventPublisher);
                (repo, publisher)
            }
        };

    let user_service = Arc::new(UserService::new(repo, publisher));
    Ok(Arc::new(AppState::new(config, user_service)))
}

fn init_tracing(cfg: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match cfg.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };
    if installed.is_ok() {
        return;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
