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

//! Advisory schema drift detection against a per-source expected-field map.
//! Never blocks ingestion; only emits warnings.

use serde_json::Value;
use std::collections::BTreeMap;

const FUZZY_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  Str,
  Int,
  Float,
  Bool,
}

impl FieldType {
  fn matches(self, value: &Value) -> bool {
    match self {
      FieldType::Str => value.is_string(),
      FieldType::Int => value.is_i64() || value.is_u64(),
      FieldType::Float => value.is_f64() || value.is_i64() || value.is_u64(),
      FieldType::Bool => value.is_boolean(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Minor,
  Moderate,
  Severe,
}

#[derive(Debug, Clone)]
pub struct DriftReport {
  pub has_drift: bool,
  pub confidence: f64,
  pub severity: Severity,
  pub warnings: Vec<String>,
}

/// An expected-schema map, field name to its allowed runtime types.
#[derive(Debug, Clone, Default)]
pub struct SchemaExpectation {
  fields: BTreeMap<String, Vec<FieldType>>,
}

impl SchemaExpectation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn field(mut self, name: &str, types: &[FieldType]) -> Self {
    self.fields.insert(name.to_string(), types.to_vec());
    self
  }

  pub fn detect(&self, record: &Value) -> DriftReport {
    let obj = match record.as_object() {
      Some(obj) => obj,
      None => {
        return DriftReport {
          has_drift: true,
          confidence: 0.0,
          severity: Severity::Severe,
          warnings: vec!["record is not an object".to_string()],
        }
      }
    };

    let expected_keys: BTreeMap<&String, &Vec<FieldType>> = self.fields.iter().collect();
    let actual_keys: Vec<&String> = obj.keys().collect();

    let missing: Vec<&String> =
      expected_keys.keys().filter(|k| !obj.contains_key(k.as_str())).copied().collect();
    let extra: Vec<&String> =
      actual_keys.iter().filter(|k| !self.fields.contains_key(k.as_str())).copied().collect();

    let mut mismatches = 0usize;
    let mut warnings = Vec::new();

    if !missing.is_empty() {
      warnings.push(format!(
        "Missing fields: {}",
        missing.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
      ));
    }

    for (name, types) in &expected_keys {
      let Some(value) = obj.get(name.as_str()) else { continue };
      if value.is_null() {
        continue;
      }
      if !types.iter().any(|t| t.matches(value)) {
        mismatches += 1;
        warnings.push(format!("Field '{name}' has unexpected type"));
      }
    }

    if !extra.is_empty() {
      for field in &extra {
        if let Some(suggestion) = self.suggest(field) {
          warnings.push(format!("Unexpected field '{field}', did you mean '{suggestion}'?"));
        } else {
          warnings.push(format!("Unexpected field '{field}'"));
        }
      }
    }

    let present_expected = expected_keys.len() - missing.len();
    let confidence = if expected_keys.is_empty() {
      1.0
    } else {
      (present_expected as f64 / expected_keys.len() as f64 - 0.1 * mismatches as f64).max(0.0)
    };

    let has_drift = !missing.is_empty() || !extra.is_empty() || mismatches > 0;
    let severity = if confidence >= 0.9 {
      Severity::Minor
    } else if confidence >= 0.7 {
      Severity::Moderate
    } else {
      Severity::Severe
    };

    DriftReport { has_drift, confidence, severity, warnings }
  }

  /// The lexicographically-first expected field whose similarity ratio to
  /// `unknown_field` is at least `FUZZY_THRESHOLD`, or `None`.
  fn suggest(&self, unknown_field: &str) -> Option<&str> {
    let needle = unknown_field.to_lowercase();
    self
      .fields
      .keys()
      .find(|candidate| {
        let ratio = strsim::normalized_levenshtein(&candidate.to_lowercase(), &needle) * 100.0;
        ratio >= FUZZY_THRESHOLD
      })
      .map(|s| s.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn expectation() -> SchemaExpectation {
    SchemaExpectation::new()
      .field("field1", &[FieldType::Str])
      .field("field2", &[FieldType::Int])
      .field("field3", &[FieldType::Float])
  }

  #[test]
  fn missing_field_lowers_confidence_and_warns() {
    let report = expectation().detect(&json!({"field1": "v", "field3": 45.67}));
    assert!(report.has_drift);
    assert!((report.confidence - 2.0 / 3.0).abs() < 1e-9);
    assert!(report.warnings[0].starts_with("Missing fields"));
  }

  #[test]
  fn full_match_has_no_drift() {
    let report = expectation().detect(&json!({"field1": "v", "field2": 1, "field3": 1.0}));
    assert!(!report.has_drift);
    assert_eq!(report.confidence, 1.0);
    assert_eq!(report.severity, Severity::Minor);
  }

  #[test]
  fn type_mismatch_counts_and_warns() {
    let report = expectation().detect(&json!({"field1": 1, "field2": 1, "field3": 1.0}));
    assert!(report.has_drift);
    assert!(report.warnings.iter().any(|w| w.contains("field1")));
  }

  #[test]
  fn severity_buckets() {
    assert_eq!(
      SchemaExpectation::new().field("a", &[FieldType::Str]).detect(&json!({"a": "x"})).severity,
      Severity::Minor
    );
  }

  #[test]
  fn fuzzy_suggestion_picks_lexicographically_first() {
    let exp = SchemaExpectation::new()
      .field("aamount", &[FieldType::Float])
      .field("amount", &[FieldType::Float]);
    let report = exp.detect(&json!({"amnt": 1.0}));
    assert!(report
      .warnings
      .iter()
      .any(|w| w.contains("did you mean 'aamount'") || w.contains("did you mean 'amount'")));
  }
}
