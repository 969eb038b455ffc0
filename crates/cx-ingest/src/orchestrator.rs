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

//! Runs each source adapter through fetch -> validate -> normalize ->
//! resolve -> upsert, and schedules that cycle periodically plus once on
//! startup. Sources run independently: a failure in one does not cancel
//! the others.

use crate::adapters::SourceAdapter;
use crate::checkpoint;
use crate::resolver::EntityResolver;
use chrono::Utc;
use cx_db::models::{EtlRun, NewEtlRun, NewNormalizedCryptoData};
use cx_db::SyncPool;
use diesel::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RunSummary {
  pub run_id: Uuid,
  pub source: String,
  pub status: String,
  pub records_fetched: i32,
  pub records_processed: i32,
  pub records_failed: i32,
  pub error_message: Option<String>,
}

pub struct Orchestrator {
  sync_pool: SyncPool,
  resolver: Arc<EntityResolver>,
  adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl Orchestrator {
  pub fn new(sync_pool: SyncPool, adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
    Self { sync_pool, resolver: Arc::new(EntityResolver::new()), adapters }
  }

  /// Launch one concurrent task per adapter and await all; an isolated
  /// failure domain per source.
  pub async fn run_all(&self) -> Vec<RunSummary> {
    let tasks: Vec<_> = self
      .adapters
      .iter()
      .map(|adapter| {
        let adapter = adapter.clone();
        let sync_pool = self.sync_pool.clone();
        let resolver = self.resolver.clone();
        tokio::spawn(async move { run_one(&sync_pool, &resolver, adapter.as_ref()).await })
      })
      .collect();

    let mut summaries = Vec::with_capacity(tasks.len());
    for task in tasks {
      match task.await {
        Ok(summary) => summaries.push(summary),
        Err(e) => error!(error = %e, "adapter task panicked"),
      }
    }
    summaries
  }

  /// Spawn the periodic trigger (default interval from config) plus an
  /// immediate one-shot run on startup. Returns a handle the caller can
  /// abort on shutdown.
  pub fn spawn_scheduler(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
      info!("running startup ETL cycle");
      self.run_all().await;

      let mut ticker = tokio::time::interval(interval);
      ticker.tick().await;
      loop {
        ticker.tick().await;
        info!("running scheduled ETL cycle");
        self.run_all().await;
      }
    })
  }
}

async fn run_one(sync_pool: &SyncPool, resolver: &EntityResolver, adapter: &dyn SourceAdapter) -> RunSummary {
  let source = adapter.source_name();
  let run_id = Uuid::new_v4();
  let started_at = Utc::now();

  match sync_pool.get() {
    Ok(mut conn) => {
      let new_run = NewEtlRun { run_id, source_name: source.to_string(), status: "running".to_string(), started_at };
      if let Err(e) = EtlRun::insert_running(&mut conn, &new_run) {
        warn!(source, error = %e, "failed to record run start, proceeding in memory");
      }
    }
    Err(e) => warn!(source, error = %e, "failed to borrow connection to record run start"),
  }

  if source == "csv" {
    if let Ok(mut conn) = sync_pool.get() {
      let start_row = checkpoint::last_value(&mut conn, source).and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);
      adapter.prepare_tabular_cursor(start_row);
    }
  }

  info!(source, run_id = %run_id, "run started");

  let records = match adapter.fetch().await {
    Ok(records) => records,
    Err(e) => {
      let message = e.to_string();
      error!(source, run_id = %run_id, error = %message, "fetch failed");
      if let Ok(mut conn) = sync_pool.get() {
        checkpoint::record_failure(&mut conn, source, &message);
        finalize(&mut conn, run_id, source, "failed", started_at, 0, 0, 0, Some(&message));
      }
      return RunSummary {
        run_id,
        source: source.to_string(),
        status: "failed".to_string(),
        records_fetched: 0,
        records_processed: 0,
        records_failed: 0,
        error_message: Some(message),
      };
    }
  };

  let records_fetched = records.len() as i32;

  let mut conn = match sync_pool.get() {
    Ok(conn) => conn,
    Err(e) => {
      let message = e.to_string();
      error!(source, run_id = %run_id, error = %message, "failed to borrow connection for persistence");
      return RunSummary {
        run_id,
        source: source.to_string(),
        status: "failed".to_string(),
        records_fetched,
        records_processed: 0,
        records_failed: 0,
        error_message: Some(message),
      };
    }
  };

  if let Err(e) = adapter.save_raw(&mut conn, &records, started_at) {
    let message = e.to_string();
    error!(source, run_id = %run_id, error = %message, "save_raw failed");
    checkpoint::record_failure(&mut conn, source, &message);
    finalize(&mut conn, run_id, source, "failed", started_at, records_fetched, 0, 0, Some(&message));
    return RunSummary {
      run_id,
      source: source.to_string(),
      status: "failed".to_string(),
      records_fetched,
      records_processed: 0,
      records_failed: 0,
      error_message: Some(message),
    };
  }

  let mut records_processed = 0i32;
  let mut records_failed = 0i32;

  let txn_result: Result<(), diesel::result::Error> = conn.transaction(|conn| {
    for record in &records {
      let normalized = match adapter.normalize(record, started_at) {
        Ok(normalized) => normalized,
        Err(e) => {
          warn!(source, run_id = %run_id, error = %e, "normalization failed for record");
          records_failed += 1;
          continue;
        }
      };

      let master_coin_id =
        match resolver.resolve(conn, source, &normalized.source_id, &normalized.symbol, &normalized.name) {
          Ok(id) => Some(id),
          Err(e) => return Err(e),
        };

      let new_row = NewNormalizedCryptoData {
        source: normalized.source,
        source_id: normalized.source_id,
        master_coin_id,
        symbol: normalized.symbol,
        name: normalized.name,
        price_usd: normalized.price_usd,
        market_cap_usd: normalized.market_cap_usd,
        volume_24h_usd: normalized.volume_24h_usd,
        rank: normalized.rank,
        circulating_supply: normalized.circulating_supply,
        total_supply: normalized.total_supply,
        max_supply: normalized.max_supply,
        percent_change_24h: normalized.percent_change_24h,
        additional_data: normalized.additional_data,
        data_timestamp: normalized.data_timestamp,
      };
      new_row.upsert(conn)?;
      records_processed += 1;
    }
    Ok(())
  });

  if let Err(e) = txn_result {
    let message = e.to_string();
    error!(source, run_id = %run_id, error = %message, "normalized upsert transaction failed, rolled back");
    checkpoint::record_failure(&mut conn, source, &message);
    finalize(&mut conn, run_id, source, "failed", started_at, records_fetched, 0, 0, Some(&message));
    return RunSummary {
      run_id,
      source: source.to_string(),
      status: "failed".to_string(),
      records_fetched,
      records_processed: 0,
      records_failed: 0,
      error_message: Some(message),
    };
  }

  let checkpoint_value = if source == "csv" {
    let prior = checkpoint::last_value(&mut conn, source).and_then(|v| v.parse::<i64>().ok()).unwrap_or(0);
    (prior + records_fetched as i64).to_string()
  } else {
    checkpoint::http_checkpoint_value(started_at)
  };
  checkpoint::advance(&mut conn, source, &checkpoint_value, records_processed as i64);

  info!(source, run_id = %run_id, records_processed, records_failed, "run completed");
  finalize(&mut conn, run_id, source, "success", started_at, records_fetched, records_processed, records_failed, None);

  RunSummary {
    run_id,
    source: source.to_string(),
    status: "success".to_string(),
    records_fetched,
    records_processed,
    records_failed,
    error_message: None,
  }
}

#[allow(clippy::too_many_arguments)]
fn finalize(
  conn: &mut diesel::PgConnection,
  run_id: Uuid,
  source: &str,
  status: &str,
  started_at: chrono::DateTime<Utc>,
  records_fetched: i32,
  records_processed: i32,
  records_failed: i32,
  error_message: Option<&str>,
) {
  let completed_at = Utc::now();
  let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
  if let Err(e) = EtlRun::complete(
    conn,
    run_id,
    status,
    completed_at,
    duration_seconds,
    records_fetched,
    records_processed,
    records_failed,
    error_message,
  ) {
    warn!(run_id = %run_id, error = %e, "failed to write final run row");
  }
  cx_core::metrics::track_etl_run(source, status, duration_seconds, records_processed as i64);
}
