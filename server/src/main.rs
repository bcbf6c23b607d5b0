mod config;
mod db;
mod records;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, FallbackConfig};
use crate::services::file_store::FileRecordStore;
use crate::services::memory_store::MemoryStore;
use crate::services::notify::{Notifier, ResendNotifier};
use crate::services::persistence::{PersistenceGateway, RecordStore};
use crate::services::pg_store::PgRecordStore;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, ".env could not be loaded"),
    }

    let config = AppConfig::from_env().expect("invalid configuration");

    // Primary tier is optional; the pool connects lazily so a down database
    // only pushes writes to the fallback.
    let primary: Option<Arc<dyn RecordStore>> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections, config.primary_timeout)
                .expect("DATABASE_URL is not a valid Postgres URL");
            if let Err(e) = db::migrate(&pool).await {
                tracing::warn!(error = %e, "database migrations failed; primary store running with an unverified schema");
            }
            Some(Arc::new(PgRecordStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; all submissions go to the fallback store");
            None
        }
    };

    let fallback: Arc<dyn RecordStore> = match &config.fallback {
        FallbackConfig::File(path) => {
            let store = FileRecordStore::new(path.clone());
            tracing::info!(path = %store.path().display(), "fallback store: json file");
            Arc::new(store)
        }
        FallbackConfig::Memory => {
            tracing::warn!("fallback store: in-memory, contents are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let notifier = config
        .notify
        .as_ref()
        .map(|n| Arc::new(ResendNotifier::new(n)) as Arc<dyn Notifier>);
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; admin routes are disabled");
    }

    let gateway = PersistenceGateway::new(primary, fallback, config.primary_timeout);
    tracing::info!(primary = gateway.has_primary(), "persistence gateway ready");
    let state = state::AppState::new(gateway, notifier, config.admin_token.clone());

    let app = match config.static_dir.clone() {
        Some(dir) => routes::app_with_static(state, config.max_body_bytes, dir),
        None => routes::app(state, config.max_body_bytes),
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "invite-server listening");
    axum::serve(listener, app).await.expect("server failed");
}
