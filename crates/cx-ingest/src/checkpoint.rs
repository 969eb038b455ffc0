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

//! Thin orchestration-facing wrapper over `cx_db::models::checkpoint`.
//!
//! `checkpoint_value` is opaque here by design: an ISO-8601 timestamp for
//! the HTTP sources, a row count for csv. Nothing in this module inspects
//! its shape; callers interpret it per source.

use chrono::Utc;
use cx_db::models::EtlCheckpoint;
use diesel::PgConnection;
use serde_json::Value;
use tracing::warn;

/// Last-known checkpoint value for `source`, or `None` if never recorded.
pub fn last_value(conn: &mut PgConnection, source: &str) -> Option<String> {
  match EtlCheckpoint::read(conn, source) {
    Ok(row) => row.and_then(|r| r.checkpoint_value),
    Err(e) => {
      warn!(source, error = %e, "failed to read checkpoint");
      None
    }
  }
}

/// Advance the checkpoint after a successful run. A failure to persist is
/// logged but never propagated — it must not poison the run outcome.
pub fn advance(conn: &mut PgConnection, source: &str, value: &str, records_processed: i64) {
  let metadata: Value = serde_json::json!({ "records_processed": records_processed });
  if let Err(e) = EtlCheckpoint::mark_success(conn, source, value, &metadata) {
    warn!(source, error = %e, "failed to advance checkpoint");
  }
}

/// Record a failed run. `checkpoint_value` is left untouched so the next
/// run resumes from the prior success.
pub fn record_failure(conn: &mut PgConnection, source: &str, reason: &str) {
  if let Err(e) = EtlCheckpoint::mark_failure(conn, source, reason) {
    warn!(source, error = %e, "failed to record checkpoint failure");
  }
}

/// The checkpoint value an HTTP source writes on success: the run's
/// start time in ISO-8601.
pub fn http_checkpoint_value(started_at: chrono::DateTime<Utc>) -> String {
  started_at.to_rfc3339()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn http_checkpoint_value_is_rfc3339() {
    let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(http_checkpoint_value(t), "2026-01-01T00:00:00+00:00");
  }
}
