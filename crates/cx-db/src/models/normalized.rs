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

//! The unified fact table, `normalized_crypto_data`.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::normalized_crypto_data;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = normalized_crypto_data)]
pub struct NormalizedCryptoData {
  pub id: i64,
  pub source: String,
  pub source_id: String,
  pub master_coin_id: Option<i32>,
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

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = normalized_crypto_data)]
pub struct NewNormalizedCryptoData {
  pub source: String,
  pub source_id: String,
  pub master_coin_id: Option<i32>,
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

impl NewNormalizedCryptoData {
  /// Upsert on the natural key `(source, source_id, data_timestamp)`.
  /// Only `master_coin_id`/`price_usd`/`market_cap_usd`/`volume_24h_usd`
  /// are refreshed on conflict — price/volume freshness wins, everything
  /// else (rank, supply figures, additional_data) is left as first-seen.
  pub fn upsert(&self, conn: &mut PgConnection) -> Result<(), diesel::result::Error> {
    diesel::insert_into(normalized_crypto_data::table)
      .values(self)
      .on_conflict((
        normalized_crypto_data::source,
        normalized_crypto_data::source_id,
        normalized_crypto_data::data_timestamp,
      ))
      .do_update()
      .set((
        normalized_crypto_data::master_coin_id.eq(self.master_coin_id),
        normalized_crypto_data::price_usd.eq(&self.price_usd),
        normalized_crypto_data::market_cap_usd.eq(&self.market_cap_usd),
        normalized_crypto_data::volume_24h_usd.eq(&self.volume_24h_usd),
      ))
      .execute(conn)?;
    Ok(())
  }
}

/// Equality/range filters for `/data`.
#[derive(Debug, Clone, Default)]
pub struct NormalizedDataFilter {
  pub source: Option<String>,
  pub symbol: Option<String>,
  pub start_date: Option<DateTime<Utc>>,
  pub end_date: Option<DateTime<Utc>>,
}

impl NormalizedCryptoData {
  pub fn count(
    conn: &mut PgConnection,
    filter: &NormalizedDataFilter,
  ) -> Result<i64, diesel::result::Error> {
    let mut query = normalized_crypto_data::table.into_boxed();
    query = Self::apply_filter(query, filter);
    query.count().get_result(conn)
  }

  pub fn page(
    conn: &mut PgConnection,
    filter: &NormalizedDataFilter,
    page: i64,
    page_size: i64,
  ) -> Result<Vec<NormalizedCryptoData>, diesel::result::Error> {
    let mut query = normalized_crypto_data::table.into_boxed();
    query = Self::apply_filter(query, filter);
    query
      .order((normalized_crypto_data::data_timestamp.desc(), normalized_crypto_data::id.desc()))
      .limit(page_size)
      .offset((page - 1) * page_size)
      .select(NormalizedCryptoData::as_select())
      .load(conn)
  }

  fn apply_filter<'a>(
    mut query: normalized_crypto_data::BoxedQuery<'a, diesel::pg::Pg>,
    filter: &'a NormalizedDataFilter,
  ) -> normalized_crypto_data::BoxedQuery<'a, diesel::pg::Pg> {
    if let Some(source) = &filter.source {
      query = query.filter(normalized_crypto_data::source.eq(source));
    }
    if let Some(symbol) = &filter.symbol {
      query = query.filter(normalized_crypto_data::symbol.eq(symbol.to_uppercase()));
    }
    if let Some(start) = filter.start_date {
      query = query.filter(normalized_crypto_data::data_timestamp.ge(start));
    }
    if let Some(end) = filter.end_date {
      query = query.filter(normalized_crypto_data::data_timestamp.le(end));
    }
    query
  }
}
