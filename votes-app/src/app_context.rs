use crate::application::VoteStore;
use crate::config::Config;
use crate::infrastructure::db::{self, VoteRepository};
use sea_orm::DatabaseConnection;
use votes_errors::AppError;

#[derive(Clone)]
pub struct AppContext {
    pub votes: VoteStore,
}

impl AppContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            votes: VoteStore::new(VoteRepository::new(db)),
        }
    }

    /// Opens the pool and makes sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let db = db::create_connection(database_url, max_connections).await?;
        db::run_migrations(&db).await?;
        Ok(Self::new(db))
    }

    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        tracing::info!("Connecting to database (max {} connections)", config.max_connections);
        Self::connect(&config.database_url, config.max_connections).await
    }
}
