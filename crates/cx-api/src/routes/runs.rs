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

//! Run history, pairwise comparison, and rolling-window anomaly detection.

use crate::error::ApiError;
use crate::schemas::{AnomalyReportResponse, EtlRunSummary, RunComparisonResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use cx_db::models::EtlRun;
use cx_ingest::analytics::{compare_runs, detect_anomalies};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RunsQuery {
  #[serde(default = "default_limit")]
  pub limit: i64,
  pub source: Option<String>,
  pub status: Option<String>,
}

fn default_limit() -> i64 {
  50
}

pub async fn get_runs(
  state: web::Data<AppState>,
  query: web::Query<RunsQuery>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();
  if !(1..=100).contains(&query.limit) {
    return Err(ApiError::Validation("limit must be between 1 and 100".to_string()));
  }

  let sync_pool = state.sync_pool.clone();
  let runs = web::block(move || -> Result<Vec<EtlRun>, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    Ok(EtlRun::recent(&mut conn, query.limit, query.source.as_deref(), query.status.as_deref())?)
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  let summaries: Vec<EtlRunSummary> = runs.iter().map(EtlRunSummary::from).collect();
  Ok(HttpResponse::Ok().json(summaries))
}

#[derive(Debug, Deserialize)]
pub struct CompareRunsQuery {
  pub run1_id: Uuid,
  pub run2_id: Uuid,
}

pub async fn compare_runs_handler(
  state: web::Data<AppState>,
  query: web::Query<CompareRunsQuery>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();
  let sync_pool = state.sync_pool.clone();
  let (run1, run2) = web::block(move || -> Result<(Option<EtlRun>, Option<EtlRun>), ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    let run1 = EtlRun::find(&mut conn, query.run1_id)?;
    let run2 = EtlRun::find(&mut conn, query.run2_id)?;
    Ok((run1, run2))
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  let run1 = run1.ok_or_else(|| ApiError::NotFound(format!("run {} not found", query.run1_id)))?;
  let run2 = run2.ok_or_else(|| ApiError::NotFound(format!("run {} not found", query.run2_id)))?;

  if run1.source_name != run2.source_name {
    return Err(ApiError::Validation("cannot compare runs from different sources".to_string()));
  }

  let comparison = compare_runs(&run1, &run2);
  Ok(HttpResponse::Ok().json(RunComparisonResponse::new(&run1, &run2, comparison)))
}

#[derive(Debug, Deserialize)]
pub struct AnomaliesQuery {
  #[serde(default = "default_hours")]
  pub hours: i64,
}

fn default_hours() -> i64 {
  24
}

pub async fn get_anomalies(
  state: web::Data<AppState>,
  query: web::Query<AnomaliesQuery>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();
  if !(1..=168).contains(&query.hours) {
    return Err(ApiError::Validation("hours must be between 1 and 168".to_string()));
  }

  let since = Utc::now() - Duration::hours(query.hours);
  let sync_pool = state.sync_pool.clone();
  let runs = web::block(move || -> Result<Vec<EtlRun>, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    Ok(EtlRun::in_window(&mut conn, since)?)
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  let anomalies = detect_anomalies(&runs);
  let reports: Vec<AnomalyReportResponse> = anomalies.into_iter().map(AnomalyReportResponse::from).collect();
  Ok(HttpResponse::Ok().json(reports))
}
