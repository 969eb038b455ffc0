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

//! Canonical coin identity: `master_coins` and `coin_source_mappings`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{coin_source_mappings, master_coins};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = master_coins)]
pub struct MasterCoin {
  pub id: i32,
  pub symbol: String,
  pub name: String,
  pub canonical_id: String,
  pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = master_coins)]
pub struct NewMasterCoin {
  pub symbol: String,
  pub name: String,
  pub canonical_id: String,
  pub updated_at: DateTime<Utc>,
}

impl MasterCoin {
  pub fn find_by_symbol(
    conn: &mut PgConnection,
    symbol: &str,
  ) -> Result<Option<MasterCoin>, diesel::result::Error> {
    master_coins::table
      .filter(master_coins::symbol.eq(symbol))
      .first(conn)
      .optional()
  }

  /// Insert a new master coin, or on `symbol` conflict refresh `name` and
  /// `updated_at` and return the (now-updated) existing row.
  pub fn upsert(
    conn: &mut PgConnection,
    new_coin: &NewMasterCoin,
  ) -> Result<MasterCoin, diesel::result::Error> {
    diesel::insert_into(master_coins::table)
      .values(new_coin)
      .on_conflict(master_coins::symbol)
      .do_update()
      .set((
        master_coins::name.eq(&new_coin.name),
        master_coins::updated_at.eq(new_coin.updated_at),
      ))
      .get_result(conn)
  }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = coin_source_mappings)]
pub struct CoinSourceMapping {
  pub id: i64,
  pub source: String,
  pub source_id: String,
  pub master_coin_id: i32,
  pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = coin_source_mappings)]
pub struct NewCoinSourceMapping {
  pub source: String,
  pub source_id: String,
  pub master_coin_id: i32,
}

impl CoinSourceMapping {
  pub fn find(
    conn: &mut PgConnection,
    source: &str,
    source_id: &str,
  ) -> Result<Option<CoinSourceMapping>, diesel::result::Error> {
    coin_source_mappings::table
      .filter(coin_source_mappings::source.eq(source))
      .filter(coin_source_mappings::source_id.eq(source_id))
      .first(conn)
      .optional()
  }

  /// Insert the `(source, source_id) -> master_coin_id` mapping; a
  /// conflict on `(source, source_id)` is silently ignored, since the
  /// mapping is already correct (idempotent by construction).
  pub fn insert_if_absent(
    conn: &mut PgConnection,
    new_mapping: &NewCoinSourceMapping,
  ) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(coin_source_mappings::table)
      .values(new_mapping)
      .on_conflict((coin_source_mappings::source, coin_source_mappings::source_id))
      .do_nothing()
      .execute(conn)
  }
}

/// `lowercase(name)`, spaces to hyphens, dots stripped.
pub fn slug(name: &str) -> String {
  name.to_lowercase().replace(' ', "-").replace('.', "")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slug_lowercases_and_hyphenates() {
    assert_eq!(slug("Bitcoin Cash"), "bitcoin-cash");
  }

  #[test]
  fn slug_strips_dots() {
    assert_eq!(slug("0x.finance"), "0xfinance");
  }
}
