// src/sources/types.rs
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Debug;

use crate::error::DashboardError;

/// Result of one source fetch. Never an `Err`: failures are data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(DashboardError),
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn failure(&self) -> Option<&DashboardError> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Failure(e) => Some(e),
        }
    }

    /// Metric set, or the default table when the fetch failed.
    pub fn or_defaults(self, defaults: impl FnOnce() -> T) -> T {
        match self {
            FetchOutcome::Success(m) => m,
            FetchOutcome::Failure(_) => defaults(),
        }
    }
}

/// One external dataset. Implementations must absorb every error.
#[async_trait::async_trait]
pub trait SourceClient: Send + Sync {
    type Metrics: Send + 'static;

    /// Performs exactly one outbound request.
    async fn fetch(&self) -> FetchOutcome<Self::Metrics>;

    /// The fully-defaulted metric set.
    fn defaults(&self) -> Self::Metrics;

    fn name(&self) -> &'static str;
}

/// Optional-field record as published by a provider, plus its default table.
///
/// `Default` must be the all-absent record, so `Self::default().normalize()`
/// is exactly the default table.
pub trait SourceRecord: DeserializeOwned + Default + Send + 'static {
    type Metrics: Clone + Debug + PartialEq + Send + Sync + 'static;

    const NAME: &'static str;

    fn normalize(self) -> Self::Metrics;

    fn defaults() -> Self::Metrics {
        Self::default().normalize()
    }
}

/// Pull the first entry of the `records` array out of a response body.
pub fn parse_first_record<R: SourceRecord>(body: &str) -> Result<R, DashboardError> {
    let malformed = |reason: String| DashboardError::MalformedResponse {
        source_name: R::NAME,
        reason,
    };

    let root: Value =
        serde_json::from_str(body).map_err(|e| malformed(format!("body is not JSON: {e}")))?;
    let records = root
        .get("records")
        .ok_or_else(|| malformed("missing 'records'".into()))?
        .as_array()
        .ok_or_else(|| malformed("'records' is not an array".into()))?;
    let first = records
        .first()
        .ok_or_else(|| malformed("'records' is empty".into()))?;
    if !first.is_object() {
        return Err(malformed("first record is not an object".into()));
    }
    R::deserialize(first).map_err(|e| malformed(e.to_string()))
}

/// Accepts numbers and numeric strings ("1,250,000" included).
/// Anything else, and non-finite values, reads as absent. `0` is a real value.
pub fn lenient_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(number_from_value))
}

fn number_from_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Percentage field: out-of-range reads as absent.
pub(crate) fn percent_or(v: Option<f64>, default: f64) -> f64 {
    v.filter(|x| (0.0..=100.0).contains(x)).unwrap_or(default)
}

/// Count field: non-positive reads as absent; fractional counts round.
pub(crate) fn count_or(v: Option<f64>, default: u64) -> u64 {
    v.filter(|x| *x >= 0.5 && *x < u64::MAX as f64)
        .map(|x| x.round() as u64)
        .unwrap_or(default)
}
