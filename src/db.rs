//! Connection pool, schema bootstrap, and the bounded blocking helper.

use std::time::Duration;

use actix_web::web;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PoolError};
use diesel::PgConnection;

use crate::config::Config;
use crate::error::ApiError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

// Kept under the default request timeout so an unreachable database surfaces
// as 503 from pool acquisition rather than 504 from the request deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Idempotent schema guard for the patient service.
pub const PATIENTS_DDL: &str = "\
CREATE TABLE IF NOT EXISTS patients (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255),
    age INT
)";

/// Idempotent schema guard for the appointment service.
pub const APPOINTMENTS_DDL: &str = "\
CREATE TABLE IF NOT EXISTS appointments (
    id SERIAL PRIMARY KEY,
    patient_id INT,
    doctor VARCHAR(255),
    date DATE,
    time TIME
)";

/// Build the r2d2 pool. Fails fast when the database is unreachable, which
/// matches the original services failing at boot.
pub fn build_pool(config: &Config) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    r2d2::Pool::builder()
        .max_size(config.db_pool_size)
        .connection_timeout(CONNECT_TIMEOUT)
        .build(manager)
}

/// Create the service's table if it does not exist. Safe to run on every
/// boot; each service only ever issues its own table's DDL.
pub fn ensure_schema(pool: &DbPool, ddl: &str) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    diesel::sql_query(ddl).execute(&mut conn)?;
    Ok(())
}

/// Run one database operation on the blocking pool, bounded by the request
/// timeout. The closure owns its pooled connection; it is returned to the
/// pool on every exit path when the closure drops it.
pub async fn run_bounded<T, F>(timeout: Duration, op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, web::block(op)).await {
        Err(_) => Err(ApiError::Timeout(timeout.as_secs())),
        Ok(Err(blocking)) => Err(ApiError::Blocking(blocking)),
        Ok(Ok(result)) => result,
    }
}
