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

//! The process-wide Prometheus registry and the metric instances named
//! in the external interfaces section. A single registry lives for the
//! life of the process (unlike a scrape-time-only registry) so counters
//! and histograms accumulate across requests/runs.

use prometheus::{CounterVec, Encoder, GaugeVec, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static ETL_RUNS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
  let metric = CounterVec::new(
    Opts::new("etl_runs_total", "Total number of ETL runs"),
    &["source", "status"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register etl_runs_total");
  metric
});

pub static ETL_RECORDS_PROCESSED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
  let metric = CounterVec::new(
    Opts::new("etl_records_processed_total", "Total number of records processed by ETL"),
    &["source"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register etl_records_processed_total");
  metric
});

pub static ETL_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
  let metric = HistogramVec::new(
    prometheus::HistogramOpts::new("etl_duration_seconds", "ETL run duration in seconds")
      .buckets(vec![10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0]),
    &["source"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register etl_duration_seconds");
  metric
});

pub static API_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
  let metric = CounterVec::new(
    Opts::new("api_requests_total", "Total number of API requests"),
    &["endpoint", "method", "status_code"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register api_requests_total");
  metric
});

pub static API_LATENCY_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
  let metric = HistogramVec::new(
    prometheus::HistogramOpts::new("api_latency_seconds", "API request latency in seconds")
      .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
    &["endpoint"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register api_latency_seconds");
  metric
});

pub static DB_CONNECTIONS_ACTIVE: LazyLock<prometheus::Gauge> = LazyLock::new(|| {
  let metric = prometheus::Gauge::new("db_connections_active", "Active database connections")
    .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register db_connections_active");
  metric
});

pub static NORMALIZED_RECORDS_TOTAL: LazyLock<prometheus::Gauge> = LazyLock::new(|| {
  let metric =
    prometheus::Gauge::new("normalized_records_total", "Total rows in normalized_crypto_data")
      .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register normalized_records_total");
  metric
});

pub static ETL_LAST_SUCCESS_TIMESTAMP: LazyLock<GaugeVec> = LazyLock::new(|| {
  let metric = GaugeVec::new(
    Opts::new("etl_last_success_timestamp", "Epoch seconds of the last successful ETL run"),
    &["source"],
  )
  .expect("valid metric opts");
  REGISTRY.register(Box::new(metric.clone())).expect("register etl_last_success_timestamp");
  metric
});

/// Called by the orchestrator at the end of every run.
pub fn track_etl_run(source: &str, status: &str, duration_seconds: f64, records_processed: i64) {
  ETL_RUNS_TOTAL.with_label_values(&[source, status]).inc();
  ETL_RECORDS_PROCESSED_TOTAL.with_label_values(&[source]).inc_by(records_processed as f64);
  ETL_DURATION_SECONDS.with_label_values(&[source]).observe(duration_seconds);
  if status == "success" {
    ETL_LAST_SUCCESS_TIMESTAMP
      .with_label_values(&[source])
      .set(chrono::Utc::now().timestamp() as f64);
  }
}

/// Called by the request-id/latency middleware after every response.
pub fn track_api_request(endpoint: &str, method: &str, status_code: u16, latency_seconds: f64) {
  API_REQUESTS_TOTAL.with_label_values(&[endpoint, method, &status_code.to_string()]).inc();
  API_LATENCY_SECONDS.with_label_values(&[endpoint]).observe(latency_seconds);
}

/// Render the registry in Prometheus text exposition format.
pub fn encode() -> Result<Vec<u8>, prometheus::Error> {
  let encoder = TextEncoder::new();
  let families = REGISTRY.gather();
  let mut buf = Vec::new();
  encoder.encode(&families, &mut buf)?;
  Ok(buf)
}
