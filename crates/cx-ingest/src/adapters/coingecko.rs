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

use super::SourceAdapter;
use crate::drift::{FieldType, SchemaExpectation};
use crate::error::{IngestError, IngestResult};
use crate::normalizer::{normalize_coingecko, NormalizedRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cx_core::{PROVIDER_PAGE_SIZE, PROVIDER_TIMEOUT_SECS};
use cx_db::models::NewRawCoinGecko;
use diesel::PgConnection;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

pub struct CoinGeckoAdapter {
  client: reqwest::Client,
  api_key: Option<String>,
  rate_limit_requests: u32,
  rate_limit_period: u64,
  expectation: SchemaExpectation,
}

impl CoinGeckoAdapter {
  pub fn new(api_key: Option<String>, rate_limit_requests: u32, rate_limit_period: u64) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key,
      rate_limit_requests: rate_limit_requests.max(1),
      rate_limit_period,
      expectation: SchemaExpectation::new()
        .field("id", &[FieldType::Str])
        .field("symbol", &[FieldType::Str])
        .field("name", &[FieldType::Str])
        .field("current_price", &[FieldType::Float, FieldType::Int])
        .field("market_cap", &[FieldType::Float, FieldType::Int])
        .field("total_volume", &[FieldType::Float, FieldType::Int])
        .field("market_cap_rank", &[FieldType::Int]),
    }
  }
}

#[async_trait]
impl SourceAdapter for CoinGeckoAdapter {
  fn source_name(&self) -> &'static str {
    "coingecko"
  }

  async fn fetch(&self) -> IngestResult<Vec<Value>> {
    let mut request = self
      .client
      .get(BASE_URL)
      .query(&[
        ("vs_currency", "usd".to_string()),
        ("order", "market_cap_desc".to_string()),
        ("per_page", PROVIDER_PAGE_SIZE.to_string()),
        ("page", "1".to_string()),
        ("sparkline", "false".to_string()),
      ])
      .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS));
    if let Some(key) = &self.api_key {
      request = request.header("x-cg-demo-api-key", key);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
      return Err(IngestError::Http(format!("coingecko returned {}", response.status())));
    }
    let records: Vec<Value> = response.json().await?;
    debug!(count = records.len(), "fetched coingecko markets");

    if self.rate_limit_requests > 0 {
      let spacer = self.rate_limit_period as f64 / self.rate_limit_requests as f64;
      tokio::time::sleep(Duration::from_secs_f64(spacer)).await;
    }

    Ok(records)
  }

  fn validate(&self, record: &Value) -> bool {
    let structurally_valid = record.get("symbol").and_then(Value::as_str).is_some_and(|s| !s.is_empty())
      && record.get("name").and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    if !structurally_valid {
      warn!(?record, "coingecko record failed structural validation");
      return false;
    }

    let report = self.expectation.detect(record);
    if report.has_drift {
      warn!(confidence = report.confidence, warnings = ?report.warnings, "coingecko schema drift detected");
    }
    true
  }

  fn save_raw(
    &self,
    conn: &mut PgConnection,
    records: &[Value],
    fetched_at: DateTime<Utc>,
  ) -> IngestResult<usize> {
    let rows: Vec<NewRawCoinGecko> = records
      .iter()
      .filter(|r| self.validate(r))
      .filter_map(|r| {
        let coin_id = r.get("id").and_then(Value::as_str)?.to_string();
        let symbol = r.get("symbol").and_then(Value::as_str)?.to_uppercase();
        let name = r.get("name").and_then(Value::as_str)?.to_string();
        Some(NewRawCoinGecko { coin_id, symbol, name, payload: r.clone(), data_timestamp: fetched_at })
      })
      .collect();
    Ok(NewRawCoinGecko::save_all(conn, &rows)?)
  }

  fn normalize(&self, record: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord> {
    normalize_coingecko(record, fetched_at)
  }
}
