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

//! The tabular source. Unlike the two HTTP adapters, progress is tracked
//! by row count rather than timestamp: `set_start_row` is called by the
//! orchestrator with the prior checkpoint value before each `fetch`.
//!
//! If the file has shrunk since the last run, the start row can point
//! past EOF; per the resolved reading of the source behavior, that
//! returns an empty batch rather than rewinding.

use super::SourceAdapter;
use crate::error::IngestResult;
use crate::normalizer::{normalize_csv, NormalizedRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cx_db::models::NewRawCsv;
use diesel::PgConnection;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

const ROW_NUMBER_KEY: &str = "__csv_row_number";

pub struct CsvAdapter {
  csv_path: String,
  start_row: AtomicUsize,
}

impl CsvAdapter {
  pub fn new(csv_path: String) -> Self {
    Self { csv_path, start_row: AtomicUsize::new(0) }
  }

  /// Set by the orchestrator from the prior checkpoint's row count.
  pub fn set_start_row(&self, start_row: usize) {
    self.start_row.store(start_row, Ordering::SeqCst);
  }
}

#[async_trait]
impl SourceAdapter for CsvAdapter {
  fn source_name(&self) -> &'static str {
    "csv"
  }

  async fn fetch(&self) -> IngestResult<Vec<Value>> {
    if !Path::new(&self.csv_path).exists() {
      debug!(path = %self.csv_path, "csv source file absent, emitting empty batch");
      return Ok(Vec::new());
    }

    let file = File::open(&self.csv_path)?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (row_number, result) in reader.records().enumerate() {
      let record = result?;
      let mut obj = serde_json::Map::new();
      for (header, value) in headers.iter().zip(record.iter()) {
        obj.insert(header.to_string(), Value::String(value.trim().to_string()));
      }
      obj.insert(ROW_NUMBER_KEY.to_string(), Value::from(row_number as i64));
      rows.push(Value::Object(obj));
    }

    let start = self.start_row.load(Ordering::SeqCst);
    if start >= rows.len() {
      warn!(start_row = start, total_rows = rows.len(), "csv cursor at or past EOF, returning empty batch");
      return Ok(Vec::new());
    }

    Ok(rows.split_off(start))
  }

  fn validate(&self, record: &Value) -> bool {
    let valid = record.get("symbol").and_then(Value::as_str).is_some_and(|s| !s.is_empty())
      && record.get("name").and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    if !valid {
      warn!(?record, "csv record failed structural validation");
    }
    valid
  }

  fn save_raw(
    &self,
    conn: &mut PgConnection,
    records: &[Value],
    fetched_at: DateTime<Utc>,
  ) -> IngestResult<usize> {
    let rows: Vec<NewRawCsv> = records
      .iter()
      .filter(|r| self.validate(r))
      .filter_map(|r| {
        let row_number = r.get(ROW_NUMBER_KEY)?.as_i64()?;
        Some(NewRawCsv {
          source_file: self.csv_path.clone(),
          row_number,
          payload: r.clone(),
          data_timestamp: fetched_at,
        })
      })
      .collect();
    Ok(NewRawCsv::save_all(conn, &rows)?)
  }

  fn normalize(&self, record: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord> {
    normalize_csv(record, fetched_at)
  }

  fn prepare_tabular_cursor(&self, start_row: usize) {
    self.set_start_row(start_row);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::NamedTempFile;

  fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
  }

  #[tokio::test]
  async fn missing_file_yields_empty_batch() {
    let adapter = CsvAdapter::new("/nonexistent/path.csv".to_string());
    let rows = adapter.fetch().await.unwrap();
    assert!(rows.is_empty());
  }

  #[tokio::test]
  async fn fetch_slices_off_already_consumed_rows() {
    let file = write_csv("symbol,name,price_usd\nBTC,Bitcoin,1\nETH,Ethereum,2\nSOL,Solana,3\n");
    let adapter = CsvAdapter::new(file.path().to_str().unwrap().to_string());
    adapter.set_start_row(1);
    let rows = adapter.fetch().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("symbol").unwrap(), "ETH");
  }

  #[tokio::test]
  async fn start_row_past_eof_returns_empty_without_rewinding() {
    let file = write_csv("symbol,name\nBTC,Bitcoin\n");
    let adapter = CsvAdapter::new(file.path().to_str().unwrap().to_string());
    adapter.set_start_row(10);
    let rows = adapter.fetch().await.unwrap();
    assert!(rows.is_empty());
  }
}
