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

//! Source-faithful raw archives: `raw_coinpaprika`, `raw_coingecko`, `raw_csv`.
//!
//! Each save is an idempotent upsert on the archive's natural key; a
//! conflicting row is skipped, not overwritten, so `save` returns only
//! the count of rows actually inserted.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::schema::{raw_coingecko, raw_coinpaprika, raw_csv};

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = raw_coinpaprika)]
pub struct NewRawCoinPaprika {
  pub coin_id: String,
  pub symbol: String,
  pub name: String,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = raw_coinpaprika)]
pub struct RawCoinPaprika {
  pub id: i64,
  pub coin_id: String,
  pub symbol: String,
  pub name: String,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl NewRawCoinPaprika {
  /// Bulk-insert rows, silently dropping conflicts on `(coin_id, data_timestamp)`.
  /// Returns the number of rows actually inserted.
  pub fn save_all(
    conn: &mut PgConnection,
    rows: &[NewRawCoinPaprika],
  ) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(raw_coinpaprika::table)
      .values(rows)
      .on_conflict((raw_coinpaprika::coin_id, raw_coinpaprika::data_timestamp))
      .do_nothing()
      .execute(conn)
  }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = raw_coingecko)]
pub struct NewRawCoinGecko {
  pub coin_id: String,
  pub symbol: String,
  pub name: String,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = raw_coingecko)]
pub struct RawCoinGecko {
  pub id: i64,
  pub coin_id: String,
  pub symbol: String,
  pub name: String,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl NewRawCoinGecko {
  pub fn save_all(
    conn: &mut PgConnection,
    rows: &[NewRawCoinGecko],
  ) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(raw_coingecko::table)
      .values(rows)
      .on_conflict((raw_coingecko::coin_id, raw_coingecko::data_timestamp))
      .do_nothing()
      .execute(conn)
  }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = raw_csv)]
pub struct NewRawCsv {
  pub source_file: String,
  pub row_number: i64,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = raw_csv)]
pub struct RawCsv {
  pub id: i64,
  pub source_file: String,
  pub row_number: i64,
  pub payload: Value,
  pub data_timestamp: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl NewRawCsv {
  pub fn save_all(
    conn: &mut PgConnection,
    rows: &[NewRawCsv],
  ) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(raw_csv::table)
      .values(rows)
      .on_conflict((raw_csv::source_file, raw_csv::row_number))
      .do_nothing()
      .execute(conn)
  }
}
