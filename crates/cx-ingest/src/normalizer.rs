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

//! Per-source pure mapping functions: raw provider payload -> `NormalizedRecord`.
//!
//! A missing or null numeric becomes `None`, never zero. Absent `symbol`
//! or `name` fails loudly (`IngestError::Normalization`).

use crate::error::{IngestError, IngestResult};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct NormalizedRecord {
  pub source: String,
  pub source_id: String,
  pub symbol: String,
  pub name: String,
  pub price_usd: Option<BigDecimal>,
  pub market_cap_usd: Option<BigDecimal>,
  pub volume_24h_usd: Option<BigDecimal>,
  pub rank: Option<i32>,
  pub circulating_supply: Option<BigDecimal>,
  pub total_supply: Option<BigDecimal>,
  pub max_supply: Option<BigDecimal>,
  pub percent_change_24h: Option<BigDecimal>,
  pub additional_data: Value,
  pub data_timestamp: DateTime<Utc>,
}

fn decimal(value: Option<&Value>) -> Option<BigDecimal> {
  match value? {
    Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
    Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
    _ => None,
  }
}

fn int(value: Option<&Value>) -> Option<i32> {
  match value? {
    Value::Number(n) => n.as_i64().map(|v| v as i32),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}

fn required_str(obj: &serde_json::Map<String, Value>, field: &str) -> IngestResult<String> {
  obj
    .get(field)
    .and_then(Value::as_str)
    .map(str::to_string)
    .filter(|s| !s.is_empty())
    .ok_or_else(|| IngestError::Normalization(format!("missing required field '{field}'")))
}

/// CoinPaprika: prefer top-level price/volume/market-cap fields, falling
/// back to the nested `quotes.USD.*` sub-quote when absent.
pub fn normalize_coinpaprika(raw: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord> {
  let obj = raw.as_object().ok_or_else(|| IngestError::Normalization("not an object".to_string()))?;

  let symbol = required_str(obj, "symbol")?.to_uppercase();
  let name = required_str(obj, "name")?;
  let source_id = obj.get("id").and_then(Value::as_str).unwrap_or(&symbol).to_string();

  let quote = obj.get("quotes").and_then(|q| q.get("USD"));
  let price_usd = decimal(obj.get("price_usd")).or_else(|| decimal(quote.and_then(|q| q.get("price"))));
  let volume_24h_usd =
    decimal(obj.get("volume_24h_usd")).or_else(|| decimal(quote.and_then(|q| q.get("volume_24h"))));
  let market_cap_usd =
    decimal(obj.get("market_cap_usd")).or_else(|| decimal(quote.and_then(|q| q.get("market_cap"))));

  let mut additional_data = serde_json::Map::new();
  if let Some(v) = obj.get("percent_change_1h").or_else(|| quote.and_then(|q| q.get("percent_change_1h"))) {
    additional_data.insert("percent_change_1h".to_string(), v.clone());
  }
  if let Some(v) = obj.get("percent_change_7d").or_else(|| quote.and_then(|q| q.get("percent_change_7d"))) {
    additional_data.insert("percent_change_7d".to_string(), v.clone());
  }

  Ok(NormalizedRecord {
    source: "coinpaprika".to_string(),
    source_id,
    symbol,
    name,
    price_usd,
    market_cap_usd,
    volume_24h_usd,
    rank: int(obj.get("rank")),
    circulating_supply: decimal(obj.get("circulating_supply")),
    total_supply: decimal(obj.get("total_supply")),
    max_supply: decimal(obj.get("max_supply")),
    percent_change_24h: decimal(
      obj.get("percent_change_24h").or_else(|| quote.and_then(|q| q.get("percent_change_24h"))),
    ),
    additional_data: Value::Object(additional_data),
    data_timestamp: fetched_at,
  })
}

/// CoinGecko: `current_price -> price_usd`, `market_cap -> market_cap_usd`,
/// `total_volume -> volume_24h_usd`, `market_cap_rank -> rank`,
/// `price_change_percentage_24h -> percent_change_24h`.
pub fn normalize_coingecko(raw: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord> {
  let obj = raw.as_object().ok_or_else(|| IngestError::Normalization("not an object".to_string()))?;

  let symbol = required_str(obj, "symbol")?.to_uppercase();
  let name = required_str(obj, "name")?;
  let source_id = obj.get("id").and_then(Value::as_str).unwrap_or(&symbol).to_string();

  let mut additional_data = serde_json::Map::new();
  for field in ["high_24h", "low_24h", "price_change_24h", "ath", "atl"] {
    if let Some(v) = obj.get(field) {
      additional_data.insert(field.to_string(), v.clone());
    }
  }

  Ok(NormalizedRecord {
    source: "coingecko".to_string(),
    source_id,
    symbol,
    name,
    price_usd: decimal(obj.get("current_price")),
    market_cap_usd: decimal(obj.get("market_cap")),
    volume_24h_usd: decimal(obj.get("total_volume")),
    rank: int(obj.get("market_cap_rank")),
    circulating_supply: decimal(obj.get("circulating_supply")),
    total_supply: decimal(obj.get("total_supply")),
    max_supply: decimal(obj.get("max_supply")),
    percent_change_24h: decimal(obj.get("price_change_percentage_24h")),
    additional_data: Value::Object(additional_data),
    data_timestamp: fetched_at,
  })
}

/// Tabular source: no rank or supply figures; `percent_change_24h` passes
/// through unchanged.
pub fn normalize_csv(raw: &Value, fetched_at: DateTime<Utc>) -> IngestResult<NormalizedRecord> {
  let obj = raw.as_object().ok_or_else(|| IngestError::Normalization("not an object".to_string()))?;

  let symbol = required_str(obj, "symbol")?.to_uppercase();
  let name = required_str(obj, "name")?;
  let source_id = format!("csv_{symbol}");

  Ok(NormalizedRecord {
    source: "csv".to_string(),
    source_id,
    symbol,
    name,
    price_usd: decimal(obj.get("price_usd")),
    market_cap_usd: decimal(obj.get("market_cap_usd")),
    volume_24h_usd: decimal(obj.get("volume_24h_usd")),
    rank: None,
    circulating_supply: None,
    total_supply: None,
    max_supply: None,
    percent_change_24h: decimal(obj.get("percent_change_24h")),
    additional_data: Value::Object(serde_json::Map::new()),
    data_timestamp: fetched_at,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use bigdecimal::BigDecimal;
  use serde_json::json;
  use std::str::FromStr;

  fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
  }

  #[test]
  fn coinpaprika_prefers_top_level_fields() {
    let raw = json!({
      "id": "btc-bitcoin", "symbol": "BTC", "name": "Bitcoin", "rank": 1,
      "price_usd": 43250.50, "volume_24h_usd": 28500000000i64,
      "market_cap_usd": 845000000000i64, "percent_change_24h": 2.5,
      "circulating_supply": 19500000
    });
    let rec = normalize_coinpaprika(&raw, now()).unwrap();
    assert_eq!(rec.source, "coinpaprika");
    assert_eq!(rec.symbol, "BTC");
    assert_eq!(rec.price_usd, Some(BigDecimal::from_str("43250.50").unwrap()));
    assert_eq!(rec.rank, Some(1));
  }

  #[test]
  fn coinpaprika_falls_back_to_nested_quote() {
    let raw = json!({
      "id": "btc-bitcoin", "symbol": "btc", "name": "Bitcoin",
      "quotes": {"USD": {"price": 100.0, "volume_24h": 200.0, "market_cap": 300.0}}
    });
    let rec = normalize_coinpaprika(&raw, now()).unwrap();
    assert_eq!(rec.price_usd, Some(BigDecimal::from_str("100.0").unwrap()));
    assert_eq!(rec.volume_24h_usd, Some(BigDecimal::from_str("200.0").unwrap()));
  }

  #[test]
  fn coingecko_maps_nested_fields_identically_to_coinpaprika_scenario() {
    let raw = json!({
      "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
      "current_price": 43250.50, "total_volume": 28500000000i64,
      "market_cap": 845000000000i64, "market_cap_rank": 1
    });
    let rec = normalize_coingecko(&raw, now()).unwrap();
    assert_eq!(rec.price_usd, Some(BigDecimal::from_str("43250.50").unwrap()));
    assert_eq!(rec.rank, Some(1));
  }

  #[test]
  fn csv_source_id_is_prefixed_and_uppercased() {
    let raw = json!({"symbol": "eth", "name": "Ethereum"});
    let rec = normalize_csv(&raw, now()).unwrap();
    assert_eq!(rec.source_id, "csv_ETH");
    assert_eq!(rec.rank, None);
  }

  #[test]
  fn missing_symbol_fails_loudly() {
    let raw = json!({"name": "Bitcoin"});
    assert!(normalize_coinpaprika(&raw, now()).is_err());
  }

  #[test]
  fn missing_numeric_is_none_not_zero() {
    let raw = json!({"symbol": "btc", "name": "Bitcoin"});
    let rec = normalize_coinpaprika(&raw, now()).unwrap();
    assert_eq!(rec.price_usd, None);
  }
}
