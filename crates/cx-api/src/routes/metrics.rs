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

//! Prometheus text exposition. Refreshes the database-backed gauges
//! (`db_connections_active`, `normalized_records_total`,
//! `etl_last_success_timestamp`) from current state before rendering,
//! since those don't have a natural call site elsewhere, unlike the
//! counters/histograms the orchestrator and request middleware update
//! as events happen.

use crate::state::AppState;
use actix_web::{http::header::ContentType, web, HttpResponse};
use cx_db::models::{EtlRun, NormalizedCryptoData, NormalizedDataFilter};
use std::collections::HashMap;
use tracing::{error, warn};

pub async fn metrics_handler(state: web::Data<AppState>) -> HttpResponse {
  let pool_state = state.sync_pool.state();
  let active_connections = pool_state.connections.saturating_sub(pool_state.idle_connections);
  cx_core::metrics::DB_CONNECTIONS_ACTIVE.set(active_connections as f64);

  let sync_pool = state.sync_pool.clone();
  let snapshot = web::block(move || -> Result<(i64, Vec<EtlRun>), String> {
    let mut conn = sync_pool.get().map_err(|e| e.to_string())?;
    let total =
      NormalizedCryptoData::count(&mut conn, &NormalizedDataFilter::default()).map_err(|e| e.to_string())?;
    let runs = EtlRun::all(&mut conn).map_err(|e| e.to_string())?;
    Ok((total, runs))
  })
  .await;

  match snapshot {
    Ok(Ok((total, runs))) => {
      cx_core::metrics::NORMALIZED_RECORDS_TOTAL.set(total as f64);

      let mut last_success_by_source: HashMap<&str, chrono::DateTime<chrono::Utc>> = HashMap::new();
      for run in &runs {
        if run.status != "success" {
          continue;
        }
        if let Some(completed_at) = run.completed_at {
          last_success_by_source
            .entry(run.source_name.as_str())
            .and_modify(|existing| {
              if completed_at > *existing {
                *existing = completed_at;
              }
            })
            .or_insert(completed_at);
        }
      }
      for (source, completed_at) in last_success_by_source {
        cx_core::metrics::ETL_LAST_SUCCESS_TIMESTAMP
          .with_label_values(&[source])
          .set(completed_at.timestamp() as f64);
      }
    }
    Ok(Err(e)) => warn!(error = %e, "failed to refresh database gauges before exposing metrics"),
    Err(e) => warn!(error = %e, "blocking task failed while refreshing database gauges"),
  }

  match cx_core::metrics::encode() {
    Ok(body) => HttpResponse::Ok().content_type(ContentType::plaintext()).body(body),
    Err(e) => {
      error!(error = %e, "failed to encode prometheus metrics");
      HttpResponse::InternalServerError().finish()
    }
  }
}
