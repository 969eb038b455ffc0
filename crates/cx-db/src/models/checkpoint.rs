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

//! One row per source, `etl_checkpoints`. `checkpoint_value` is opaque
//! storage: an ISO-8601 timestamp for HTTP sources, a row count for csv.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::schema::etl_checkpoints;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = etl_checkpoints)]
#[diesel(primary_key(source_name))]
pub struct EtlCheckpoint {
  pub source_name: String,
  pub checkpoint_value: Option<String>,
  pub last_success_at: Option<DateTime<Utc>>,
  pub last_failure_at: Option<DateTime<Utc>>,
  pub failure_reason: Option<String>,
  pub metadata: Option<Value>,
}

impl EtlCheckpoint {
  pub fn read(
    conn: &mut PgConnection,
    source_name: &str,
  ) -> Result<Option<EtlCheckpoint>, diesel::result::Error> {
    etl_checkpoints::table.find(source_name).first(conn).optional()
  }

  /// Atomically advance `checkpoint_value`, `last_success_at`, and `metadata`.
  pub fn mark_success(
    conn: &mut PgConnection,
    source_name: &str,
    value: &str,
    metadata: &Value,
  ) -> Result<(), diesel::result::Error> {
    diesel::insert_into(etl_checkpoints::table)
      .values((
        etl_checkpoints::source_name.eq(source_name),
        etl_checkpoints::checkpoint_value.eq(value),
        etl_checkpoints::last_success_at.eq(Utc::now()),
        etl_checkpoints::metadata.eq(metadata),
      ))
      .on_conflict(etl_checkpoints::source_name)
      .do_update()
      .set((
        etl_checkpoints::checkpoint_value.eq(value),
        etl_checkpoints::last_success_at.eq(Utc::now()),
        etl_checkpoints::metadata.eq(metadata),
      ))
      .execute(conn)?;
    Ok(())
  }

  /// Updates only `last_failure_at`/`failure_reason`; `checkpoint_value`
  /// is left untouched so the next run resumes from the prior success.
  pub fn mark_failure(
    conn: &mut PgConnection,
    source_name: &str,
    reason: &str,
  ) -> Result<(), diesel::result::Error> {
    diesel::insert_into(etl_checkpoints::table)
      .values((
        etl_checkpoints::source_name.eq(source_name),
        etl_checkpoints::last_failure_at.eq(Utc::now()),
        etl_checkpoints::failure_reason.eq(reason),
      ))
      .on_conflict(etl_checkpoints::source_name)
      .do_update()
      .set((
        etl_checkpoints::last_failure_at.eq(Utc::now()),
        etl_checkpoints::failure_reason.eq(reason),
      ))
      .execute(conn)?;
    Ok(())
  }
}
