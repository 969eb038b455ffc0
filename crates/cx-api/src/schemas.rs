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

//! Wire-format response types. Decimals are converted to `f64` at this
//! edge only — storage and business logic keep `BigDecimal` throughout.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use cx_db::models::{EtlRun, NormalizedCryptoData};
use cx_ingest::analytics::{Anomaly, RunComparison, Severity};
use serde::Serialize;
use std::collections::HashMap;

/// Lossy-to-float conversion for display; never used in persistence.
pub fn decimal_to_f64(value: &Option<BigDecimal>) -> Option<f64> {
  value.as_ref().and_then(|d| d.to_string().parse::<f64>().ok())
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
  pub service: String,
  pub version: String,
  pub status: String,
  pub docs: String,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
  pub connected: bool,
  pub latency_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct EtlHealthStatus {
  pub last_run: Option<DateTime<Utc>>,
  pub status: String,
  pub records_processed: i32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status: String,
  pub database: DatabaseHealth,
  pub etl: EtlHealthStatus,
}

#[derive(Debug, Serialize)]
pub struct CryptoDataResponse {
  pub id: i64,
  pub source: String,
  pub symbol: String,
  pub name: String,
  pub price_usd: Option<f64>,
  pub market_cap_usd: Option<f64>,
  pub volume_24h_usd: Option<f64>,
  pub rank: Option<i32>,
  pub percent_change_24h: Option<f64>,
  pub data_timestamp: DateTime<Utc>,
}

impl From<&NormalizedCryptoData> for CryptoDataResponse {
  fn from(row: &NormalizedCryptoData) -> Self {
    Self {
      id: row.id,
      source: row.source.clone(),
      symbol: row.symbol.clone(),
      name: row.name.clone(),
      price_usd: decimal_to_f64(&row.price_usd),
      market_cap_usd: decimal_to_f64(&row.market_cap_usd),
      volume_24h_usd: decimal_to_f64(&row.volume_24h_usd),
      rank: row.rank,
      percent_change_24h: decimal_to_f64(&row.percent_change_24h),
      data_timestamp: row.data_timestamp,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PaginationMetadata {
  pub page: i64,
  pub page_size: i64,
  pub total_records: i64,
  pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct DataApiResponse {
  pub request_id: String,
  pub api_latency_ms: f64,
  pub data: Vec<CryptoDataResponse>,
  pub pagination: PaginationMetadata,
}

#[derive(Debug, Serialize)]
pub struct EtlSourceStats {
  pub records: i64,
  pub last_run: Option<DateTime<Utc>>,
  pub last_success: Option<DateTime<Utc>>,
  pub last_failure: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub total_runs: i64,
  pub last_success: Option<DateTime<Utc>>,
  pub last_failure: Option<DateTime<Utc>>,
  pub total_records_processed: i64,
  pub average_duration_seconds: Option<f64>,
  pub sources: HashMap<String, EtlSourceStats>,
}

#[derive(Debug, Serialize)]
pub struct EtlRunSummary {
  pub run_id: String,
  pub source_name: String,
  pub status: String,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
  pub duration_seconds: Option<f64>,
  pub records_processed: i32,
  pub records_failed: i32,
}

impl From<&EtlRun> for EtlRunSummary {
  fn from(run: &EtlRun) -> Self {
    Self {
      run_id: run.run_id.to_string(),
      source_name: run.source_name.clone(),
      status: run.status.clone(),
      started_at: run.started_at,
      completed_at: run.completed_at,
      duration_seconds: run.duration_seconds,
      records_processed: run.records_processed,
      records_failed: run.records_failed,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct RunComparisonResponse {
  pub run1_id: String,
  pub run2_id: String,
  pub source_name: String,
  pub records_diff: i64,
  pub duration_diff_seconds: f64,
  pub records_diff_percentage: f64,
  pub duration_diff_percentage: f64,
  pub anomaly_detected: bool,
  pub anomaly_reasons: Vec<String>,
}

impl RunComparisonResponse {
  pub fn new(run1: &EtlRun, run2: &EtlRun, comparison: RunComparison) -> Self {
    Self {
      run1_id: run1.run_id.to_string(),
      run2_id: run2.run_id.to_string(),
      source_name: run1.source_name.clone(),
      records_diff: comparison.records_diff,
      duration_diff_seconds: comparison.duration_diff,
      records_diff_percentage: comparison.records_diff_percentage,
      duration_diff_percentage: comparison.duration_diff_percentage,
      anomaly_detected: comparison.anomaly_detected,
      anomaly_reasons: comparison.reasons,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct AnomalyReportResponse {
  pub run_id: String,
  pub source_name: String,
  pub anomalies: Vec<String>,
  pub severity: String,
}

impl From<Anomaly> for AnomalyReportResponse {
  fn from(anomaly: Anomaly) -> Self {
    let severity = match anomaly.severity {
      Severity::Low => "low",
      Severity::Medium => "medium",
      Severity::High => "high",
    };
    Self {
      run_id: anomaly.run_id.to_string(),
      source_name: anomaly.source,
      anomalies: anomaly.reasons,
      severity: severity.to_string(),
    }
  }
}
