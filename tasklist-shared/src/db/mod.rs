/// Database layer
///
/// - `pool`: PostgreSQL connection pool
/// - `migrations`: Schema migrations embedded from `migrations/`
///
/// Queries live on the models; the `store` module wraps them behind traits.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::db::{migrations::run_migrations, pool::{create_pool, PoolSettings}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(PoolSettings::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
