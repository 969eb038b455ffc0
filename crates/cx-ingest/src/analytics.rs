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

//! Run-history anomaly detection over a trailing window of hours.

use cx_db::models::EtlRun;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Low,
  Medium,
  High,
}

#[derive(Debug, Clone)]
pub struct Anomaly {
  pub run_id: uuid::Uuid,
  pub source: String,
  pub reasons: Vec<String>,
  pub severity: Severity,
}

/// Group `runs` (already filtered to the trailing window) by source, and
/// flag the most recent run in each group against its historical average.
pub fn detect_anomalies(runs: &[EtlRun]) -> Vec<Anomaly> {
  let mut by_source: BTreeMap<&str, Vec<&EtlRun>> = BTreeMap::new();
  for run in runs {
    by_source.entry(run.source_name.as_str()).or_default().push(run);
  }

  let mut anomalies = Vec::new();
  for (source, mut group) in by_source {
    if group.len() < 2 {
      continue;
    }
    group.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    let latest = group[0];
    let historical = &group[1..];

    let avg_records = historical.iter().map(|r| r.records_processed as f64).sum::<f64>() / historical.len() as f64;
    let avg_duration =
      historical.iter().filter_map(|r| r.duration_seconds).sum::<f64>() / historical.len() as f64;

    let mut reasons = Vec::new();

    if latest.status == "failed" {
      reasons.push("ETL run failed".to_string());
    }
    if avg_records > 0.0 {
      let delta = (latest.records_processed as f64 - avg_records).abs() / avg_records;
      if delta > 0.5 {
        reasons.push(format!("records_processed deviates {:.1}% from historical average", delta * 100.0));
      }
    }
    if avg_duration > 0.0 {
      if let Some(duration) = latest.duration_seconds {
        let delta = (duration - avg_duration).abs() / avg_duration;
        if delta > 1.0 {
          reasons.push(format!("duration_seconds deviates {:.1}% from historical average", delta * 100.0));
        }
      }
    }
    if latest.records_failed as f64 > 0.1 * latest.records_processed as f64 {
      reasons.push("high failure rate".to_string());
    }

    if reasons.is_empty() {
      continue;
    }

    let severity = if latest.status == "failed" || reasons.len() >= 3 {
      Severity::High
    } else if reasons.len() >= 2 {
      Severity::Medium
    } else {
      Severity::Low
    };

    anomalies.push(Anomaly { run_id: latest.run_id, source: source.to_string(), reasons, severity });
  }

  anomalies
}

/// Absolute and percentage deltas between two runs of the same source,
/// plus whether the comparison crosses the anomaly thresholds.
#[derive(Debug, Clone)]
pub struct RunComparison {
  pub records_diff: i64,
  pub duration_diff: f64,
  pub records_diff_percentage: f64,
  pub duration_diff_percentage: f64,
  pub anomaly_detected: bool,
  pub reasons: Vec<String>,
}

pub fn compare_runs(run1: &EtlRun, run2: &EtlRun) -> RunComparison {
  let records_diff = run2.records_processed as i64 - run1.records_processed as i64;
  let duration_diff = run2.duration_seconds.unwrap_or(0.0) - run1.duration_seconds.unwrap_or(0.0);

  let records_diff_percentage = if run1.records_processed != 0 {
    records_diff as f64 / run1.records_processed as f64 * 100.0
  } else {
    0.0
  };
  let duration_diff_percentage = match run1.duration_seconds {
    Some(d1) if d1 != 0.0 => duration_diff / d1 * 100.0,
    _ => 0.0,
  };

  let mut reasons = Vec::new();
  if records_diff_percentage.abs() > 50.0 {
    reasons.push(format!("records_processed changed by {records_diff_percentage:.1}%"));
  }
  if duration_diff_percentage.abs() > 100.0 {
    reasons.push(format!("duration_seconds changed by {duration_diff_percentage:.1}%"));
  }
  if run2.records_processed == 0 {
    reasons.push("run2 processed zero records".to_string());
  }

  RunComparison {
    records_diff,
    duration_diff,
    records_diff_percentage,
    duration_diff_percentage,
    anomaly_detected: !reasons.is_empty(),
    reasons,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  fn run(source: &str, status: &str, records: i32, duration: f64, hour: u32) -> EtlRun {
    EtlRun {
      run_id: Uuid::new_v4(),
      source_name: source.to_string(),
      status: status.to_string(),
      started_at: Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap(),
      completed_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, hour, 1, 0).unwrap()),
      duration_seconds: Some(duration),
      records_fetched: records,
      records_processed: records,
      records_failed: 0,
      error_message: None,
    }
  }

  #[test]
  fn run_comparison_matches_the_concrete_scenario() {
    let run1 = run("coinpaprika", "success", 1000, 60.0, 0);
    let run2 = run("coinpaprika", "success", 400, 140.0, 1);
    let cmp = compare_runs(&run1, &run2);
    assert_eq!(cmp.records_diff, -600);
    assert_eq!(cmp.duration_diff, 80.0);
    assert!((cmp.records_diff_percentage - (-60.0)).abs() < 1e-9);
    assert!((cmp.duration_diff_percentage - 133.333).abs() < 1e-2);
    assert!(cmp.anomaly_detected);
    assert_eq!(cmp.reasons.len(), 2);
  }

  #[test]
  fn zero_records_run2_is_an_anomaly() {
    let run1 = run("csv", "success", 100, 10.0, 0);
    let run2 = run("csv", "success", 0, 10.0, 1);
    let cmp = compare_runs(&run1, &run2);
    assert!(cmp.anomaly_detected);
    assert!(cmp.reasons.iter().any(|r| r.contains("zero records")));
  }

  #[test]
  fn failed_latest_run_is_always_flagged() {
    let runs = vec![
      run("coingecko", "failed", 0, 5.0, 2),
      run("coingecko", "success", 100, 10.0, 1),
      run("coingecko", "success", 100, 10.0, 0),
    ];
    let anomalies = detect_anomalies(&runs);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].severity, Severity::High);
  }

  #[test]
  fn single_run_source_is_skipped() {
    let runs = vec![run("csv", "success", 100, 10.0, 0)];
    assert!(detect_anomalies(&runs).is_empty());
  }
}
