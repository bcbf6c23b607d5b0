//! Primary-store connection pool and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! The database is optional and allowed to be down. The pool is created
//! lazily so startup never blocks on it; migrations are attempted once and a
//! failure is logged, leaving the gateway to route writes to the fallback
//! until the database answers.


use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Build a lazily connecting pool. `acquire_timeout` bounds how long a
/// request waits for a connection before the gateway falls back.
///
/// # Errors
///
/// Returns an error if `database_url` cannot be parsed.
pub fn init_pool(database_url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns the migrator's error, including failing to reach the database.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("src/db/migrations").run(pool).await?;
    info!("database migrations applied");
    Ok(())
}
