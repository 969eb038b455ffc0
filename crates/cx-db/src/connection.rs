/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Connection pool management: a synchronous r2d2 pool for the ingestion
//! path and an async bb8 pool for the Read API, per the two-pool model.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_async::pooled_connection::bb8;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use std::time::Duration;
use thiserror::Error;

pub type SyncPool = Pool<ConnectionManager<PgConnection>>;
pub type SyncConnection = PooledConnection<ConnectionManager<PgConnection>>;
pub type AsyncPool = bb8::Pool<AsyncPgConnection>;

const SYNC_POOL_SIZE: u32 = 5;
const SYNC_POOL_OVERFLOW: u32 = 10;
const ASYNC_POOL_SIZE: u32 = 10;
const ASYNC_POOL_OVERFLOW: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConnectionError {
  #[error("connection pool error: {0}")]
  Pool(String),
}

/// Establish a single, unpooled connection (migrations, one-off scripts).
pub fn establish_connection(database_url: &str) -> Result<PgConnection, diesel::ConnectionError> {
  PgConnection::establish(database_url)
}

/// Build the sync pool used by the ingestion path: size 5, overflow 10.
///
/// Fails fast if the database is unreachable, so a bad `DATABASE_URL_SYNC`
/// aborts startup instead of leaving r2d2 retrying in the background.
pub fn build_sync_pool(database_url: &str) -> Result<SyncPool, ConnectionError> {
  PgConnection::establish(database_url)
    .map_err(|e| ConnectionError::Pool(format!("failed to connect: {e}")))?;

  let manager = ConnectionManager::<PgConnection>::new(database_url);
  Pool::builder()
    .max_size(SYNC_POOL_SIZE + SYNC_POOL_OVERFLOW)
    .min_idle(Some(SYNC_POOL_SIZE))
    .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
    .build(manager)
    .map_err(|e| ConnectionError::Pool(e.to_string()))
}

/// Build the async pool used by the Read API: size 10, overflow 20,
/// pre-ping (`test_on_check_out`) so stale connections are recycled
/// before a request borrows one.
pub async fn build_async_pool(database_url: &str) -> Result<AsyncPool, ConnectionError> {
  let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
  bb8::Pool::builder()
    .max_size(ASYNC_POOL_SIZE + ASYNC_POOL_OVERFLOW)
    .min_idle(Some(ASYNC_POOL_SIZE))
    .test_on_check_out(true)
    .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
    .build(manager)
    .await
    .map_err(|e| ConnectionError::Pool(e.to_string()))
}

/// DB reachability check used by `/health`; returns the round-trip latency.
pub async fn check_connection(pool: &AsyncPool) -> (bool, f64) {
  use diesel_async::RunQueryDsl;
  let start = std::time::Instant::now();
  let reachable = match pool.get().await {
    Ok(mut conn) => diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
      .get_result::<i32>(&mut conn)
      .await
      .is_ok(),
    Err(_) => false,
  };
  (reachable, start.elapsed().as_secs_f64() * 1000.0)
}
