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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
  #[error("provider request failed: {0}")]
  Http(String),

  #[error("provider request timed out after {0}s")]
  Timeout(u64),

  #[error("database error: {0}")]
  Database(#[from] diesel::result::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] cx_db::ConnectionError),

  #[error("record failed validation: {0}")]
  Validation(String),

  #[error("normalization failed: {0}")]
  Normalization(String),

  #[error("csv error: {0}")]
  Csv(String),

  #[error("io error: {0}")]
  Io(String),

  #[error(transparent)]
  Config(#[from] cx_core::Error),
}

impl From<csv::Error> for IngestError {
  fn from(err: csv::Error) -> Self {
    IngestError::Csv(err.to_string())
  }
}

impl From<std::io::Error> for IngestError {
  fn from(err: std::io::Error) -> Self {
    IngestError::Io(err.to_string())
  }
}

impl From<reqwest::Error> for IngestError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      IngestError::Timeout(30)
    } else {
      IngestError::Http(err.to_string())
    }
  }
}

pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_http_error() {
    let err = IngestError::Http("connection refused".to_string());
    assert_eq!(err.to_string(), "provider request failed: connection refused");
  }

  #[test]
  fn display_validation_error() {
    let err = IngestError::Validation("missing symbol".to_string());
    assert_eq!(err.to_string(), "record failed validation: missing symbol");
  }

  #[test]
  fn from_csv_error() {
    let mut rdr = csv::Reader::from_reader("a,b\n1".as_bytes());
    let csv_err = rdr.records().next().unwrap().unwrap_err();
    let err = IngestError::from(csv_err);
    assert!(matches!(err, IngestError::Csv(_)));
  }
}
