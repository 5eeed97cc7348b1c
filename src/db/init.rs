use crate::db::{DatabaseConnection, Db as _};
use crate::utils::config::DatabaseConfig;
use std::env;

/// Connects to a database and applies migrations.
/// We use the url from the `[database]` config section by default, but we can override this by
/// setting the `DATABASE_URL` environment variable.
///
/// # Errors
/// Errors if connection to database fails.
/// Connections can fail if the database file cannot be opened, or if the database URL is invalid.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| config.url.clone());
    connect_url(&db_url, config.max_connections).await
}

/// Connects to the database at `db_url` and applies migrations.
///
/// # Errors
/// Errors if connection to database fails or a migration cannot be applied.
pub async fn connect_url(db_url: &str, max_connections: u32) -> anyhow::Result<DatabaseConnection> {
    let connection = DatabaseConnection::connect(db_url, max_connections).await?;
    tracing::info!("Connected to database");
    migrate(&connection).await?;
    Ok(connection)
}

/// Apply all pending migrations.
///
/// # Errors
/// Errors if a migration cannot be applied.
pub async fn migrate(connection: &DatabaseConnection) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(&connection.pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}
