//! Chart input series decoded from backend payloads.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::data::unescape_html;


/// Which of the two dashboard series a payload feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Mint,
    Sales,
}


impl SeriesKind {
    /// Name used in command output and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SeriesKind::Mint => "mint",
            SeriesKind::Sales => "sales",
        }
    }

    /// Key of this payload in the admin page context.
    pub fn context_key(&self) -> &'static str {
        match self {
            SeriesKind::Mint => "mint_data",
            SeriesKind::Sales => "sales_data",
        }
    }
}


impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// Why a payload could not become a [`Series`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is empty")]
    Empty,

    #[error("payload unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("length mismatch: {labels} labels but {data} data points")]
    LengthMismatch { labels: usize, data: usize },
}


#[derive(Deserialize)]
struct RawSeries {
    labels: Vec<String>,
    data: Vec<f64>,
}


/// Index-aligned (date label, value) sequence.
///
/// Construction always checks that `labels` and `data` have the same
/// length, so every `Series` in hand is well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    labels: Vec<String>,
    data: Vec<f64>,
}


impl Series {
    /// Build a series from already-parsed columns.
    pub fn new(labels: Vec<String>, data: Vec<f64>) -> Result<Self, DecodeError> {
        if labels.len() != data.len() {
            return Err(DecodeError::LengthMismatch {
                labels: labels.len(),
                data: data.len(),
            });
        }
        Ok(Self { labels, data })
    }

    /// Decode a server-escaped JSON payload such as
    /// `{&quot;labels&quot;: [&quot;2024-01-01&quot;], &quot;data&quot;: [3]}`.
    ///
    /// Plain (unescaped) JSON is accepted as well.
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(DecodeError::Empty);
        }

        let json = unescape_html(trimmed);
        let raw: RawSeries = serde_json::from_str(&json)?;
        Self::new(raw.labels, raw.data)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[allow(dead_code)]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Iterate `(label, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Smallest and largest value, `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_json() {
        let series = Series::decode(r#"{"labels": ["2024-01-01","2024-01-02"], "data": [3,5]}"#).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.labels(), ["2024-01-01", "2024-01-02"]);
        assert_eq!(series.data(), [3.0, 5.0]);
    }

    #[test]
    fn test_decode_escaped_payload() {
        let payload = "{&quot;labels&quot;: [&quot;2024-01-01&quot;], &quot;data&quot;: [10]}";
        let series = Series::decode(payload).unwrap();
        assert_eq!(series.points().collect::<Vec<_>>(), vec![("2024-01-01", 10.0)]);
    }

    #[test]
    fn test_decode_empty_series() {
        let series = Series::decode(r#"{"labels": [], "data": []}"#).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.value_range(), None);
    }

    #[test]
    fn test_decode_length_mismatch() {
        let err = Series::decode(r#"{"labels": ["a", "b"], "data": [1, 2, 3]}"#).unwrap_err();
        assert!(matches!(err, DecodeError::LengthMismatch { labels: 2, data: 3 }));
    }

    #[test]
    fn test_decode_missing_field() {
        let err = Series::decode(r#"{"labels": ["a"]}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_decode_rejects_non_numeric_data() {
        assert!(matches!(
            Series::decode(r#"{"labels": ["a"], "data": ["7"]}"#),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            Series::decode(r#"{"labels": ["a"], "data": [null]}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_blank_payload() {
        assert!(matches!(Series::decode("   \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let series = Series::decode(r#"{"labels": ["x"], "data": [1.5], "unit": "ETH"}"#).unwrap();
        assert_eq!(series.data(), [1.5]);
    }

    #[test]
    fn test_value_range() {
        let series = Series::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![4.0, -2.0, 9.0],
        )
        .unwrap();
        assert_eq!(series.value_range(), Some((-2.0, 9.0)));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SeriesKind::Mint.to_string(), "mint");
        assert_eq!(SeriesKind::Sales.context_key(), "sales_data");
    }
}
