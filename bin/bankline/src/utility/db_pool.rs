use bankline_core::store::postgres::DbPool;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use eyre::Report;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::info;

const MAX_POOL_SIZE: u32 = 50;

pub fn create_db_pool(db_url: &SecretString) -> Result<DbPool, Report> {
    let manager = ConnectionManager::<PgConnection>::new(db_url.expose_secret());

    let pool = Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .min_idle(Some(5))
        .connection_timeout(Duration::from_secs(8))
        .idle_timeout(Some(Duration::from_secs(300)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .test_on_check_out(true)
        .build(manager)?;

    info!("PostgreSQL connection pool created (max_size: {})", MAX_POOL_SIZE);

    Ok(pool)
}
