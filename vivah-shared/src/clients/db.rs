use diesel::mysql::MysqlConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_types::{BigInt, Unsigned};
use diesel::RunQueryDsl;

use crate::errors::AppError;

diesel::define_sql_function! {
    /// MySQL `LAST_INSERT_ID()`, scoped to the calling connection.
    fn last_insert_id() -> Unsigned<BigInt>;
}

pub type DbPool = Pool<ConnectionManager<MysqlConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<MysqlConnection>>;

pub fn create_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<MysqlConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .test_on_check_out(true)
        .build(manager)?;

    tracing::info!(max_size, "database connection pool created");
    Ok(pool)
}

/// Check a connection out of the pool, mapping pool exhaustion to a 500.
pub fn conn(pool: &DbPool) -> Result<DbConn, AppError> {
    pool.get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))
}

/// Round-trip `SELECT 1` for health checks.
pub fn ping(pool: &DbPool) -> Result<(), String> {
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Id generated by the most recent INSERT on this connection.
pub fn inserted_id(conn: &mut MysqlConnection) -> Result<i32, AppError> {
    let id: u64 = diesel::select(last_insert_id()).get_result(conn)?;
    i32::try_from(id).map_err(|_| AppError::internal(format!("inserted id {id} out of range")))
}
