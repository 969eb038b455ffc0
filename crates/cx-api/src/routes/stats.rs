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

//! Overall plus per-source ETL totals.

use crate::error::ApiError;
use crate::schemas::{EtlSourceStats, StatsResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use cx_db::models::EtlRun;
use std::collections::HashMap;

pub async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let sync_pool = state.sync_pool.clone();
  let runs = web::block(move || -> Result<Vec<EtlRun>, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    Ok(EtlRun::all(&mut conn)?)
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  let total_runs = runs.len() as i64;
  let last_success = latest_completed(&runs, "success");
  let last_failure = latest_completed(&runs, "failed");
  let total_records_processed: i64 = runs.iter().map(|r| r.records_processed as i64).sum();
  let durations: Vec<f64> = runs.iter().filter_map(|r| r.duration_seconds).collect();
  let average_duration_seconds =
    if durations.is_empty() { None } else { Some(durations.iter().sum::<f64>() / durations.len() as f64) };

  let mut by_source: HashMap<String, Vec<&EtlRun>> = HashMap::new();
  for run in &runs {
    by_source.entry(run.source_name.clone()).or_default().push(run);
  }

  let sources = by_source
    .into_iter()
    .map(|(source, group)| {
      let records = group.iter().map(|r| r.records_processed as i64).sum();
      let last_run = group.iter().filter_map(|r| r.completed_at).max();
      let last_success = latest_completed_ref(&group, "success");
      let last_failure = latest_completed_ref(&group, "failed");
      (source, EtlSourceStats { records, last_run, last_success, last_failure })
    })
    .collect();

  Ok(HttpResponse::Ok().json(StatsResponse {
    total_runs,
    last_success,
    last_failure,
    total_records_processed,
    average_duration_seconds,
    sources,
  }))
}

fn latest_completed(runs: &[EtlRun], status: &str) -> Option<DateTime<Utc>> {
  runs.iter().filter(|r| r.status == status).filter_map(|r| r.completed_at).max()
}

fn latest_completed_ref(runs: &[&EtlRun], status: &str) -> Option<DateTime<Utc>> {
  runs.iter().filter(|r| r.status == status).filter_map(|r| r.completed_at).max()
}
