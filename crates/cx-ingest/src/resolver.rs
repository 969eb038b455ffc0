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

//! Maps `(source, source_id)` pairs onto a canonical `master_coins.id`,
//! backed by a process-wide, insert-only cache. Entries never go stale:
//! `(source, source_id) -> master_coin_id` is permanent once written, so
//! a plain `RwLock` is sufficient given ingestion's traffic.

use chrono::Utc;
use cx_db::models::{slug, CoinSourceMapping, MasterCoin, NewCoinSourceMapping, NewMasterCoin};
use diesel::PgConnection;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

const SIMILARITY_ACCEPT_THRESHOLD: f64 = 0.7;

pub struct EntityResolver {
  cache: RwLock<HashMap<(String, String), i32>>,
}

impl Default for EntityResolver {
  fn default() -> Self {
    Self::new()
  }
}

impl EntityResolver {
  pub fn new() -> Self {
    Self { cache: RwLock::new(HashMap::new()) }
  }

  /// Drop all cached mappings. Correctness never depends on cache state.
  pub fn clear(&self) {
    self.cache.write().expect("resolver cache lock poisoned").clear();
  }

  pub fn resolve(
    &self,
    conn: &mut PgConnection,
    source: &str,
    source_id: &str,
    symbol: &str,
    name: &str,
  ) -> Result<i32, diesel::result::Error> {
    let key = (source.to_string(), source_id.to_string());
    if let Some(id) = self.cache.read().expect("resolver cache lock poisoned").get(&key) {
      return Ok(*id);
    }

    if let Some(mapping) = CoinSourceMapping::find(conn, source, source_id)? {
      self.cache.write().expect("resolver cache lock poisoned").insert(key, mapping.master_coin_id);
      return Ok(mapping.master_coin_id);
    }

    let symbol_upper = symbol.to_uppercase();
    let name_lc = name.to_lowercase();
    let master_coin_id = match MasterCoin::find_by_symbol(conn, &symbol_upper)? {
      Some(existing) if lcs_ratio(&name_lc, &existing.name.to_lowercase()) > SIMILARITY_ACCEPT_THRESHOLD => {
        existing.id
      }
      Some(existing) => {
        warn!(
          symbol = %symbol_upper,
          existing_name = %existing.name,
          new_name = %name,
          "entity resolver: name similarity below threshold, updating master coin"
        );
        create_or_update(conn, &symbol_upper, name)?
      }
      None => create_or_update(conn, &symbol_upper, name)?,
    };

    let new_mapping =
      NewCoinSourceMapping { source: source.to_string(), source_id: source_id.to_string(), master_coin_id };
    CoinSourceMapping::insert_if_absent(conn, &new_mapping)?;

    self.cache.write().expect("resolver cache lock poisoned").insert(key, master_coin_id);
    Ok(master_coin_id)
  }
}

fn create_or_update(
  conn: &mut PgConnection,
  symbol_upper: &str,
  name: &str,
) -> Result<i32, diesel::result::Error> {
  let new_coin = NewMasterCoin {
    symbol: symbol_upper.to_string(),
    name: name.to_string(),
    canonical_id: slug(name),
    updated_at: Utc::now(),
  };
  Ok(MasterCoin::upsert(conn, &new_coin)?.id)
}

/// Longest-common-subsequence-based similarity ratio in `[0, 1]`:
/// `2 * lcs_len / (len(a) + len(b))`.
pub fn lcs_ratio(a: &str, b: &str) -> f64 {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  if a.is_empty() || b.is_empty() {
    return if a.is_empty() && b.is_empty() { 1.0 } else { 0.0 };
  }

  let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
  for i in 1..=a.len() {
    for j in 1..=b.len() {
      dp[i][j] = if a[i - 1] == b[j - 1] { dp[i - 1][j - 1] + 1 } else { dp[i - 1][j].max(dp[i][j - 1]) };
    }
  }
  let lcs_len = dp[a.len()][b.len()] as f64;
  2.0 * lcs_len / (a.len() + b.len()) as f64
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_strings_have_ratio_one() {
    assert_eq!(lcs_ratio("bitcoin", "bitcoin"), 1.0);
  }

  #[test]
  fn disjoint_strings_have_ratio_zero() {
    assert_eq!(lcs_ratio("abc", "xyz"), 0.0);
  }

  #[test]
  fn near_match_exceeds_accept_threshold() {
    assert!(lcs_ratio("bitcoin cash", "bitcoin cash abc") > SIMILARITY_ACCEPT_THRESHOLD);
  }

  #[test]
  fn empty_strings_are_identical() {
    assert_eq!(lcs_ratio("", ""), 1.0);
  }

  #[test]
  fn cache_returns_same_id_without_touching_connection() {
    let resolver = EntityResolver::new();
    resolver
      .cache
      .write()
      .unwrap()
      .insert(("coinpaprika".to_string(), "btc-bitcoin".to_string()), 42);
    assert_eq!(
      resolver.cache.read().unwrap().get(&("coinpaprika".to_string(), "btc-bitcoin".to_string())),
      Some(&42)
    );
  }
}
