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

//! The uniform contract each of the three sources satisfies, plus the
//! concrete adapters. A tagged variant discriminant (`source_name`)
//! carries the source identifier used in storage.

pub mod coingecko;
pub mod coinpaprika;
pub mod csv_source;

use crate::error::IngestResult;
use crate::normalizer::NormalizedRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::PgConnection;
use serde_json::Value;

pub use coingecko::CoinGeckoAdapter;
pub use coinpaprika::CoinPaprikaAdapter;
pub use csv_source::CsvAdapter;

#[async_trait]
pub trait SourceAdapter: Send + Sync {
  /// Stable identifier used as `source` in storage and checkpoints.
  fn source_name(&self) -> &'static str;

  /// Fetch the current batch of records. One call per run.
  async fn fetch(&self) -> IngestResult<Vec<Value>>;

  /// Structural validation. Validation failure logs and drops the record.
  fn validate(&self, record: &Value) -> bool;

  /// Bulk-persist raw records with idempotent upsert on the archive's
  /// natural key; returns the count actually inserted.
  fn save_raw(
    &self,
    conn: &mut PgConnection,
    records: &[Value],
    fetched_at: DateTime<Utc>,
  ) -> IngestResult<usize>;

  /// Map a raw record into its normalized shape.
  fn normalize(&self, record: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord>;

  /// Hook for the tabular source: the orchestrator calls this with the
  /// prior checkpoint's row count before `fetch`. No-op for HTTP sources,
  /// which track progress by timestamp instead of cursor position.
  fn prepare_tabular_cursor(&self, _start_row: usize) {}
}
