pub mod entities;
mod vote_repository;

pub use vote_repository::VoteRepository;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
};
use std::time::Duration;

/// Keeps the single in-memory connection from being reaped. Finite because the
/// pool adds it to `Instant::now()` when scheduling maintenance.
const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(u32::MAX as u64);

pub async fn create_connection(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    Database::connect(connect_options(database_url, max_connections)).await
}

pub fn connect_options(database_url: &str, max_connections: u32) -> ConnectOptions {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    // An in-memory SQLite database lives only as long as its connection, so
    // the pool must never close or recycle it.
    if is_in_memory(database_url) {
        opt.max_connections(1)
            .idle_timeout(IN_MEMORY_KEEPALIVE)
            .max_lifetime(IN_MEMORY_KEEPALIVE);
    }

    opt
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Creates the `votes` table from the entity definition if it is missing.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement = schema.create_table_from_entity(entities::Vote);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;

    tracing::info!("Database schema ready ({:?})", backend);
    Ok(())
}
