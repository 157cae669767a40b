//! # Aggregation Module
//!
//! Folds flat telemetry records into per-key summaries for tables and
//! charts. The same fold backs every grouping in the console (by provider,
//! by use case, by model), so the invariants hold uniformly:
//!
//! - output order is the first-occurrence order of each key in the input
//! - a key only appears if at least one record carried it, so averages
//!   never divide by zero
//! - an empty input produces an empty output

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{EvaluationResult, RequestRecord};

/// Key used when a record's grouping field is absent.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Anything that carries per-call cost/token/latency metrics.
pub trait Metered {
    fn cost(&self) -> f64;
    fn input_tokens(&self) -> u64;
    fn output_tokens(&self) -> u64;
    fn latency_ms(&self) -> u64;
}

impl Metered for RequestRecord {
    fn cost(&self) -> f64 {
        self.cost
    }
    fn input_tokens(&self) -> u64 {
        self.input_tokens
    }
    fn output_tokens(&self) -> u64 {
        self.output_tokens
    }
    fn latency_ms(&self) -> u64 {
        self.latency_ms
    }
}

impl Metered for EvaluationResult {
    fn cost(&self) -> f64 {
        self.metrics.cost
    }
    fn input_tokens(&self) -> u64 {
        self.metrics.input_tokens
    }
    fn output_tokens(&self) -> u64 {
        self.metrics.output_tokens
    }
    fn latency_ms(&self) -> u64 {
        self.metrics.latency_ms
    }
}

/// Running sums for one group. Ephemeral: recomputed from the latest fetched
/// snapshot on every render, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub key: String,
    pub requests: u64,
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_latency_ms: u64,
}

impl Aggregate {
    fn new(key: &str) -> Self {
        Aggregate {
            key: key.to_string(),
            requests: 0,
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            total_latency_ms: 0,
        }
    }

    /// Rounded mean latency. `requests` is always >= 1 for a built group.
    pub fn avg_latency_ms(&self) -> u64 {
        (self.total_latency_ms as f64 / self.requests as f64).round() as u64
    }

    pub fn cost_per_request(&self) -> f64 {
        self.cost / self.requests as f64
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Fold records into one [`Aggregate`] per distinct key, in first-occurrence
/// order. Records whose selector returns `None` (or an empty string) land in
/// the [`UNKNOWN_KEY`] group.
pub fn summarize_by<R, F>(records: &[R], key_of: F) -> Vec<Aggregate>
where
    R: Metered,
    F: Fn(&R) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Aggregate> = Vec::new();

    for record in records {
        let key = match key_of(record) {
            Some(k) if !k.trim().is_empty() => k,
            _ => UNKNOWN_KEY.to_string(),
        };
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Aggregate::new(&key));
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.requests += 1;
        group.cost += record.cost();
        group.input_tokens += record.input_tokens();
        group.output_tokens += record.output_tokens();
        group.total_latency_ms += record.latency_ms();
    }

    groups
}

/// Request records grouped by provider.
pub fn by_provider(records: &[RequestRecord]) -> Vec<Aggregate> {
    summarize_by(records, |r| r.provider.clone())
}

/// Request records grouped by use case.
pub fn by_use_case(records: &[RequestRecord]) -> Vec<Aggregate> {
    summarize_by(records, |r| r.use_case.clone())
}

/// Request records grouped by model id.
pub fn by_model(records: &[RequestRecord]) -> Vec<Aggregate> {
    summarize_by(records, |r| r.model_id.clone())
}

/// Evaluation results grouped per model, keyed `provider:model_id` the same
/// way the backend keys its summary metrics.
pub fn by_eval_model(results: &[EvaluationResult]) -> Vec<Aggregate> {
    summarize_by(results, |r| Some(r.model_ref().summary_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(provider: Option<&str>, cost: f64, latency_ms: u64) -> RequestRecord {
        RequestRecord {
            provider: provider.map(str::to_string),
            cost,
            latency_ms,
            ..RequestRecord::default()
        }
    }

    #[test]
    fn groups_follow_first_occurrence_order() {
        let records = vec![
            record(Some("OpenAI"), 0.01, 100),
            record(Some("OpenAI"), 0.02, 300),
            record(Some("Google"), 0.005, 50),
        ];
        let groups = by_provider(&records);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].key, "OpenAI");
        assert_eq!(groups[0].requests, 2);
        assert!((groups[0].cost - 0.03).abs() < 1e-12);
        assert_eq!(groups[0].avg_latency_ms(), 200);

        assert_eq!(groups[1].key, "Google");
        assert_eq!(groups[1].requests, 1);
        assert!((groups[1].cost - 0.005).abs() < 1e-12);
        assert_eq!(groups[1].avg_latency_ms(), 50);
    }

    #[test]
    fn missing_provider_groups_under_unknown() {
        let records = vec![record(None, 0.01, 100), record(Some(""), 0.02, 200)];
        let groups = by_provider(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, UNKNOWN_KEY);
        assert_eq!(groups[0].requests, 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(by_provider(&[]).is_empty());
    }

    #[test]
    fn singleton_group_average_is_its_latency() {
        let groups = by_provider(&[record(Some("Meta"), 0.0, 873)]);
        assert_eq!(groups[0].avg_latency_ms(), 873);
    }

    #[test]
    fn rounded_average_latency() {
        // 100 + 101 over two requests rounds to 101
        let records = vec![
            record(Some("Meta"), 0.0, 100),
            record(Some("Meta"), 0.0, 101),
        ];
        assert_eq!(by_provider(&records)[0].avg_latency_ms(), 101);
    }
}
