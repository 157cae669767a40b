use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// One logged LLM call, as returned by `GET /api/analytics`.
///
/// Owned and persisted by the backend; the client only ever holds read-only
/// copies. Numeric fields are decoded leniently: a missing or malformed
/// metric contributes 0 rather than rejecting the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestRecord {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub output_tokens: u64,
    #[serde(default, deserialize_with = "wire::lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub latency_ms: u64,
    #[serde(default, deserialize_with = "wire::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RequestRecord {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
