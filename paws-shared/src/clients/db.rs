use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the r2d2 pool every service hangs off its `AppState`.
/// Ten connections is plenty for these single-purpose services; the two
/// idle ones keep cold-start latency off the first requests after a deploy.
pub fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(10)
        .min_idle(Some(2))
        .test_on_check_out(true)
        .build(manager)?;

    tracing::info!("database connection pool created");
    Ok(pool)
}
