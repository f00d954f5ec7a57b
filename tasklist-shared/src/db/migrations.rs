/// Schema migrations
///
/// SQL files under the workspace `migrations/` directory are embedded at
/// compile time and applied in timestamp order.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails or was altered after being applied
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("../migrations").run(pool).await.map_err(|e| {
        warn!("Migration failed: {}", e);
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_embedded_migrations_in_order() {
        let migrator = sqlx::migrate!("../migrations");
        let descriptions: Vec<_> = migrator
            .iter()
            .map(|m| m.description.to_string())
            .collect();

        assert_eq!(descriptions, vec!["create users", "create todos"]);
    }
}
