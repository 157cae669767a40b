use serde::{Deserialize, Serialize};

use super::wire;

/// Per-call token/cost/latency metrics, shared by chat and evaluation rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetrics {
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub output_tokens: u64,
    #[serde(default, deserialize_with = "wire::lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "wire::lenient_u64")]
    pub latency_ms: u64,
}

impl UsageMetrics {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A completed playground call: the response plus what it cost to get it.
///
/// `workload_tags` is only populated in auto-select mode, where the backend's
/// classifier tags the prompt before routing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub response: String,
    pub provider: String,
    pub model_id: String,
    pub metrics: UsageMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workload_tags: Vec<String>,
}
