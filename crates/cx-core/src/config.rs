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

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Service-wide configuration, loaded once at process startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// Async pool DSN, used by the API and the scheduler's async bookkeeping.
  pub database_url: String,

  /// Sync pool DSN, used by the ingestion path.
  pub database_url_sync: String,

  pub coinpaprika_api_key: Option<String>,
  pub coingecko_api_key: Option<String>,

  pub api_host: String,
  pub api_port: u16,
  pub api_workers: u32,

  pub etl_schedule_minutes: u64,
  pub etl_batch_size: usize,
  pub etl_rate_limit_requests: u32,
  pub etl_rate_limit_period: u64,

  pub csv_data_path: String,

  pub log_level: String,
  pub log_format: String,
  pub environment: String,

  pub migration_secret: String,
}

fn parse_env<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
  env::var(name)
    .unwrap_or_else(|_| default.to_string())
    .parse()
    .map_err(|_| Error::Config(format!("invalid {name}")))
}

impl Config {
  /// Load configuration from the environment (and `.env` if present).
  ///
  /// `DATABASE_URL` and `DATABASE_URL_SYNC` have no defaults; a missing
  /// value aborts startup per the config error-handling policy.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
      .map_err(|_| Error::Config("DATABASE_URL not set".to_string()))?;
    let database_url_sync = env::var("DATABASE_URL_SYNC")
      .map_err(|_| Error::Config("DATABASE_URL_SYNC not set".to_string()))?;

    let coinpaprika_api_key = env::var("COINPAPRIKA_API_KEY").ok();
    let coingecko_api_key = env::var("COINGECKO_API_KEY").ok();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let api_port = parse_env("API_PORT", "8000")?;
    let api_workers = parse_env("API_WORKERS", "4")?;

    let etl_schedule_minutes = parse_env("ETL_SCHEDULE_MINUTES", "30")?;
    let etl_batch_size = parse_env("ETL_BATCH_SIZE", "1000")?;
    let etl_rate_limit_requests = parse_env("ETL_RATE_LIMIT_REQUESTS", "10")?;
    let etl_rate_limit_period = parse_env("ETL_RATE_LIMIT_PERIOD", "60")?;

    let csv_data_path =
      env::var("CSV_DATA_PATH").unwrap_or_else(|_| "/app/data/crypto_data.csv".to_string());

    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let migration_secret =
      env::var("MIGRATION_SECRET").unwrap_or_else(|_| "kasparro-migrate-2024".to_string());

    Ok(Config {
      database_url,
      database_url_sync,
      coinpaprika_api_key,
      coingecko_api_key,
      api_host,
      api_port,
      api_workers,
      etl_schedule_minutes,
      etl_batch_size,
      etl_rate_limit_requests,
      etl_rate_limit_period,
      csv_data_path,
      log_level,
      log_format,
      environment,
      migration_secret,
    })
  }

  /// A config populated with defaults and a test database URL, for unit tests.
  pub fn default_with_urls(database_url: String, database_url_sync: String) -> Self {
    Config {
      database_url,
      database_url_sync,
      coinpaprika_api_key: None,
      coingecko_api_key: None,
      api_host: "0.0.0.0".to_string(),
      api_port: 8000,
      api_workers: 4,
      etl_schedule_minutes: 30,
      etl_batch_size: 1000,
      etl_rate_limit_requests: 10,
      etl_rate_limit_period: 60,
      csv_data_path: "/app/data/crypto_data.csv".to_string(),
      log_level: "INFO".to_string(),
      log_format: "json".to_string(),
      environment: "development".to_string(),
      migration_secret: "kasparro-migrate-2024".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_from_env() {
    env::set_var("DATABASE_URL", "postgres://test/async");
    env::set_var("DATABASE_URL_SYNC", "postgres://test/sync");
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "postgres://test/async");
    assert_eq!(config.etl_schedule_minutes, 30);
    assert_eq!(config.etl_rate_limit_requests, 10);
  }

  #[test]
  fn test_config_missing_database_url() {
    env::remove_var("DATABASE_URL");
    env::remove_var("DATABASE_URL_SYNC");
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
  }

  #[test]
  fn test_default_with_urls() {
    let config =
      Config::default_with_urls("postgres://a".to_string(), "postgres://b".to_string());
    assert_eq!(config.api_port, 8000);
    assert_eq!(config.etl_batch_size, 1000);
  }
}
