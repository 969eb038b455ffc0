/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
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

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use cx_core::Config;
use cx_ingest::{CoinGeckoAdapter, CoinPaprikaAdapter, CsvAdapter, Orchestrator, SourceAdapter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cx")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Run the API server and the ETL scheduler together (the normal mode).
  Serve,
  /// Run one ETL cycle across all sources and exit.
  RunOnce,
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenv().ok();

  let cli = Cli::parse();
  let config = Config::from_env().context("failed to load configuration")?;

  init_logging(&config, cli.verbose);

  match cli.command {
    Commands::Serve => serve(config).await,
    Commands::RunOnce => run_once(config).await,
  }
}

fn init_logging(config: &Config, verbose: bool) {
  let filter = if verbose { "debug".to_string() } else { config.log_level.to_lowercase() };
  let builder = tracing_subscriber::fmt().with_env_filter(filter.as_str());
  if config.log_format == "json" {
    builder.json().init();
  } else {
    builder.init();
  }
}

fn build_adapters(config: &Config) -> Vec<Arc<dyn SourceAdapter>> {
  vec![
    Arc::new(CoinPaprikaAdapter::new(
      config.coinpaprika_api_key.clone(),
      config.etl_rate_limit_requests,
      config.etl_rate_limit_period,
    )),
    Arc::new(CoinGeckoAdapter::new(
      config.coingecko_api_key.clone(),
      config.etl_rate_limit_requests,
      config.etl_rate_limit_period,
    )),
    Arc::new(CsvAdapter::new(config.csv_data_path.clone())),
  ]
}

/// Runs the scheduler and the Read API as two cooperative event loops in
/// one process, per the concurrency model: the scheduler dispatches one
/// task per source per tick, the API serves requests concurrently, and
/// neither blocks the other except through the shared DB pools.
async fn serve(config: Config) -> Result<()> {
  let sync_pool =
    cx_db::build_sync_pool(&config.database_url_sync).context("failed to build sync pool")?;
  let async_pool =
    cx_db::build_async_pool(&config.database_url).await.context("failed to build async pool")?;

  let adapters = build_adapters(&config);
  let orchestrator = Arc::new(Orchestrator::new(sync_pool.clone(), adapters));
  let interval = Duration::from_secs(config.etl_schedule_minutes * 60);

  info!(interval_minutes = config.etl_schedule_minutes, "starting ETL scheduler");
  let scheduler = orchestrator.spawn_scheduler(interval);

  let api_result = cx_api::run(config, sync_pool, async_pool).await;
  scheduler.abort();
  api_result.context("API server exited with an error")
}

/// Runs every source adapter once and exits; useful for cron-style
/// deployments or local debugging without the long-running API.
async fn run_once(config: Config) -> Result<()> {
  let sync_pool =
    cx_db::build_sync_pool(&config.database_url_sync).context("failed to build sync pool")?;
  let adapters = build_adapters(&config);
  let orchestrator = Orchestrator::new(sync_pool, adapters);

  let summaries = orchestrator.run_all().await;
  for summary in summaries {
    info!(
      source = %summary.source,
      status = %summary.status,
      records_processed = summary.records_processed,
      records_failed = summary.records_failed,
      "ETL run finished"
    );
  }

  Ok(())
}
