use std::fmt;

/// One of the three ingestion sources. Carries the storage discriminant
/// used across raw archives, `normalized_crypto_data.source`, and
/// `coin_source_mappings.source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
  CoinPaprika,
  CoinGecko,
  Csv,
}

impl DataSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      DataSource::CoinPaprika => "coinpaprika",
      DataSource::CoinGecko => "coingecko",
      DataSource::Csv => "csv",
    }
  }
}

impl fmt::Display for DataSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for DataSource {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "coinpaprika" => Ok(DataSource::CoinPaprika),
      "coingecko" => Ok(DataSource::CoinGecko),
      "csv" => Ok(DataSource::Csv),
      other => Err(crate::Error::Config(format!("unknown source: {other}"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn round_trips_through_display_and_from_str() {
    for source in [DataSource::CoinPaprika, DataSource::CoinGecko, DataSource::Csv] {
      let s = source.to_string();
      assert_eq!(DataSource::from_str(&s).unwrap(), source);
    }
  }

  #[test]
  fn rejects_unknown_source() {
    assert!(DataSource::from_str("binance").is_err());
  }
}
