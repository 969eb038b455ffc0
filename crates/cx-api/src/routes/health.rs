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

//! DB connectivity plus the most recent successful ETL run, the one
//! path that genuinely benefits from the async pool's pre-ping check.

use crate::error::ApiError;
use crate::schemas::{DatabaseHealth, EtlHealthStatus, HealthResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use cx_db::models::EtlRun;
use tracing::warn;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let (connected, latency_ms) = cx_db::check_connection(&state.async_pool).await;

  let sync_pool = state.sync_pool.clone();
  let etl = web::block(move || -> Result<Option<EtlRun>, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    Ok(EtlRun::most_recent_success(&mut conn)?)
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))?;

  let etl = match etl {
    Ok(etl) => etl,
    Err(e) => {
      warn!(error = %e, "failed to fetch ETL status for health check");
      None
    }
  };

  let etl_status = match etl {
    Some(run) => EtlHealthStatus {
      last_run: run.completed_at,
      status: run.status,
      records_processed: run.records_processed,
    },
    None => EtlHealthStatus { last_run: None, status: "unknown".to_string(), records_processed: 0 },
  };

  let overall_status = if connected { "healthy" } else { "unhealthy" };

  Ok(HttpResponse::Ok().json(HealthResponse {
    status: overall_status.to_string(),
    database: DatabaseHealth { connected, latency_ms: (latency_ms * 100.0).round() / 100.0 },
    etl: etl_status,
  }))
}
