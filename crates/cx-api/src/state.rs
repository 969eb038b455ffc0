/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
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

//! Shared application state. Queries against the row models
//! (`cx_db::models`) are all synchronous Diesel calls, so routes borrow
//! the sync pool and run them via `web::block`; the async pool is
//! reserved for the one genuinely latency-sensitive path, the `/health`
//! DB ping.

use cx_core::Config;
use cx_db::{AsyncPool, SyncPool};

pub struct AppState {
  pub sync_pool: SyncPool,
  pub async_pool: AsyncPool,
  pub config: Config,
  pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
  pub fn new(sync_pool: SyncPool, async_pool: AsyncPool, config: Config) -> Self {
    Self { sync_pool, async_pool, config, started_at: chrono::Utc::now() }
  }
}
