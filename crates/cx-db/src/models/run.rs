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

//! Per-attempt ingestion bookkeeping, `etl_runs`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::etl_runs;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = etl_runs)]
#[diesel(primary_key(run_id))]
pub struct EtlRun {
  pub run_id: Uuid,
  pub source_name: String,
  pub status: String,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
  pub duration_seconds: Option<f64>,
  pub records_fetched: i32,
  pub records_processed: i32,
  pub records_failed: i32,
  pub error_message: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = etl_runs)]
pub struct NewEtlRun {
  pub run_id: Uuid,
  pub source_name: String,
  pub status: String,
  pub started_at: DateTime<Utc>,
}

impl EtlRun {
  /// Best-effort insert of the `running` row; callers log a failure here
  /// but must not let it abort the run.
  pub fn insert_running(
    conn: &mut PgConnection,
    new_run: &NewEtlRun,
  ) -> Result<(), diesel::result::Error> {
    diesel::insert_into(etl_runs::table).values(new_run).execute(conn)?;
    Ok(())
  }

  #[allow(clippy::too_many_arguments)]
  pub fn complete(
    conn: &mut PgConnection,
    run_id: Uuid,
    status: &str,
    completed_at: DateTime<Utc>,
    duration_seconds: f64,
    records_fetched: i32,
    records_processed: i32,
    records_failed: i32,
    error_message: Option<&str>,
  ) -> Result<(), diesel::result::Error> {
    diesel::update(etl_runs::table.find(run_id))
      .set((
        etl_runs::status.eq(status),
        etl_runs::completed_at.eq(completed_at),
        etl_runs::duration_seconds.eq(duration_seconds),
        etl_runs::records_fetched.eq(records_fetched),
        etl_runs::records_processed.eq(records_processed),
        etl_runs::records_failed.eq(records_failed),
        etl_runs::error_message.eq(error_message),
      ))
      .execute(conn)?;
    Ok(())
  }

  pub fn recent(
    conn: &mut PgConnection,
    limit: i64,
    source: Option<&str>,
    status: Option<&str>,
  ) -> Result<Vec<EtlRun>, diesel::result::Error> {
    let mut query = etl_runs::table.into_boxed();
    if let Some(source) = source {
      query = query.filter(etl_runs::source_name.eq(source));
    }
    if let Some(status) = status {
      query = query.filter(etl_runs::status.eq(status));
    }
    query
      .order(etl_runs::started_at.desc())
      .limit(limit)
      .select(EtlRun::as_select())
      .load(conn)
  }

  pub fn find(
    conn: &mut PgConnection,
    run_id: Uuid,
  ) -> Result<Option<EtlRun>, diesel::result::Error> {
    etl_runs::table.find(run_id).first(conn).optional()
  }

  pub fn in_window(
    conn: &mut PgConnection,
    since: DateTime<Utc>,
  ) -> Result<Vec<EtlRun>, diesel::result::Error> {
    etl_runs::table
      .filter(etl_runs::started_at.ge(since))
      .order((etl_runs::source_name.asc(), etl_runs::started_at.desc()))
      .select(EtlRun::as_select())
      .load(conn)
  }

  pub fn most_recent_success(
    conn: &mut PgConnection,
  ) -> Result<Option<EtlRun>, diesel::result::Error> {
    etl_runs::table
      .filter(etl_runs::status.eq("success"))
      .order(etl_runs::completed_at.desc())
      .select(EtlRun::as_select())
      .first(conn)
      .optional()
  }

  /// Every run ever recorded, for `/stats`'s overall and per-source
  /// aggregates. Unbounded by design: `etl_runs` grows slowly (one row
  /// per source per scheduler tick).
  pub fn all(conn: &mut PgConnection) -> Result<Vec<EtlRun>, diesel::result::Error> {
    etl_runs::table.select(EtlRun::as_select()).load(conn)
  }
}
