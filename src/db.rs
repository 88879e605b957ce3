use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::store::StoreError;

pub type DbPool = SqlitePool;

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, StoreError> {
  tracing::info!("Initializing database at: {}", database_url);

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}
