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

//! Paginated, filtered normalized-data reads.

use crate::error::ApiError;
use crate::middleware::RequestId;
use crate::schemas::{CryptoDataResponse, DataApiResponse, PaginationMetadata};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use cx_db::models::{NormalizedCryptoData, NormalizedDataFilter};
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct DataQuery {
  #[serde(default = "default_page")]
  pub page: i64,
  #[serde(default = "default_page_size")]
  pub page_size: i64,
  pub source: Option<String>,
  pub symbol: Option<String>,
  pub start_date: Option<DateTime<Utc>>,
  pub end_date: Option<DateTime<Utc>>,
}

fn default_page() -> i64 {
  1
}

fn default_page_size() -> i64 {
  50
}

pub async fn get_data(
  req: HttpRequest,
  state: web::Data<AppState>,
  query: web::Query<DataQuery>,
) -> Result<HttpResponse, ApiError> {
  let start = Instant::now();
  let request_id =
    req.extensions().get::<RequestId>().map(RequestId::as_string).unwrap_or_default();

  let query = query.into_inner();
  if query.page < 1 {
    return Err(ApiError::Validation("page must be >= 1".to_string()));
  }
  if !(1..=1000).contains(&query.page_size) {
    return Err(ApiError::Validation("page_size must be between 1 and 1000".to_string()));
  }

  let filter = NormalizedDataFilter {
    source: query.source,
    symbol: query.symbol,
    start_date: query.start_date,
    end_date: query.end_date,
  };

  let sync_pool = state.sync_pool.clone();
  let page = query.page;
  let page_size = query.page_size;
  let (total_records, rows) = web::block(move || -> Result<_, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;
    let total = NormalizedCryptoData::count(&mut conn, &filter)?;
    let rows = NormalizedCryptoData::page(&mut conn, &filter, page, page_size)?;
    Ok((total, rows))
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  Ok(HttpResponse::Ok().json(DataApiResponse {
    request_id,
    api_latency_ms: (start.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0,
    data: rows.iter().map(CryptoDataResponse::from).collect(),
    pagination: PaginationMetadata {
      page,
      page_size,
      total_records,
      total_pages: total_pages(total_records, page_size),
    },
  }))
}

fn total_pages(total_records: i64, page_size: i64) -> i64 {
  if total_records > 0 {
    (total_records as f64 / page_size as f64).ceil() as i64
  } else {
    0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_result_set_has_zero_pages() {
    assert_eq!(total_pages(0, 50), 0);
  }

  #[test]
  fn exact_multiple_does_not_add_an_extra_page() {
    assert_eq!(total_pages(100, 50), 2);
  }

  #[test]
  fn a_remainder_rounds_up_to_one_more_page() {
    assert_eq!(total_pages(101, 50), 3);
  }

  #[test]
  fn a_single_record_still_needs_one_page() {
    assert_eq!(total_pages(1, 50), 1);
  }
}
