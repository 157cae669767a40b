//! Evaluation data: per-(prompt, model) results, manual and AI-judge scores,
//! and history batches.
//!
//! A manual score is 1-5 or unset. The backend's wire format uses 0 for
//! "unscored"; that overload stays at the serde boundary and never leaks into
//! the domain types, where unset is `None`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::chat::UsageMetrics;
use super::wire;

/// A (provider, model) pair selected for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub provider: String,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ModelRef {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.model_id)
    }

    /// Key used by the backend's summary maps and by per-model aggregates.
    pub fn summary_key(&self) -> String {
        format!("{}:{}", self.provider, self.model_id)
    }
}

/// Manual scores for one result, keyed by metric name.
///
/// The map is ordered (BTreeMap) so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualScores(pub BTreeMap<String, Option<u8>>);

impl ManualScores {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, metric: &str) -> Option<u8> {
        self.0.get(metric).copied().flatten()
    }

    /// Mean of the recorded scores; `None` when nothing has been scored.
    /// Unset metrics are excluded, never counted as zero.
    pub fn mean(&self) -> Option<f64> {
        let recorded: Vec<u8> = self.0.values().filter_map(|s| *s).collect();
        if recorded.is_empty() {
            return None;
        }
        Some(recorded.iter().map(|s| f64::from(*s)).sum::<f64>() / recorded.len() as f64)
    }
}

impl Serialize for ManualScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Unset goes back out as 0, matching the backend's wire format.
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (metric, score) in &self.0 {
            map.serialize_entry(metric, &score.unwrap_or(0))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ManualScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = ManualScores;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of metric name to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = BTreeMap::new();
                while let Some((metric, value)) = access.next_entry::<String, Value>()? {
                    scores.insert(metric, wire::score_from_value(Some(&value)));
                }
                Ok(ManualScores(scores))
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// One AI-judge verdict: a 1-5 score with a written justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiScore {
    pub metric: String,
    #[serde(
        default,
        deserialize_with = "wire::opt_score",
        serialize_with = "wire::score_to_wire"
    )]
    pub score: Option<u8>,
    #[serde(default)]
    pub reason: String,
}

/// One manual score entry as sent to `POST /api/eval/save-scores`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub metric: String,
    #[serde(
        default,
        deserialize_with = "wire::opt_score",
        serialize_with = "wire::score_to_wire"
    )]
    pub score: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

/// The judge's assessment of the prompt itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptQuality {
    #[serde(
        default,
        deserialize_with = "wire::opt_score",
        serialize_with = "wire::score_to_wire"
    )]
    pub score: Option<u8>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub intent_detected: Option<String>,
}

/// One (prompt, model) pairing from an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub prompt: String,
    #[serde(default)]
    pub provider: Option<String>,
    pub model_id: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub metrics: UsageMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ManualScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_evaluations: Option<Vec<AiScore>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_quality: Option<PromptQuality>,
}

impl EvaluationResult {
    pub fn model_ref(&self) -> ModelRef {
        ModelRef {
            provider: self.provider.clone().unwrap_or_else(|| "Unknown".to_string()),
            model_id: self.model_id.clone(),
            display_name: None,
        }
    }

    /// This result's own average manual score, `None` until scored.
    pub fn average_score(&self) -> Option<f64> {
        self.scores.as_ref().and_then(ManualScores::mean)
    }

    pub fn has_any_score(&self) -> bool {
        self.average_score().is_some()
    }
}

/// One evaluation run's full set of results, reconstructed from history rows
/// sharing a batch identifier.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationBatch {
    pub batch_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub results: Vec<EvaluationResult>,
}

impl EvaluationBatch {
    /// First prompt in the batch, used as its display title.
    pub fn title(&self) -> &str {
        self.results.first().map(|r| r.prompt.as_str()).unwrap_or("")
    }
}

/// Group flat history rows into batches, preserving the first-occurrence
/// order of each batch id (the backend returns rows newest-first, so the
/// newest batch comes first). Empty input yields an empty list.
pub fn group_batches(
    rows: Vec<(String, Option<DateTime<Utc>>, EvaluationResult)>,
) -> Vec<EvaluationBatch> {
    let mut order: Vec<String> = Vec::new();
    let mut batches: Vec<EvaluationBatch> = Vec::new();

    for (batch_id, created_at, result) in rows {
        let slot = match order.iter().position(|id| *id == batch_id) {
            Some(i) => i,
            None => {
                order.push(batch_id.clone());
                batches.push(EvaluationBatch {
                    batch_id,
                    created_at,
                    results: Vec::new(),
                });
                batches.len() - 1
            }
        };
        let batch = &mut batches[slot];
        if batch.created_at.is_none() {
            batch.created_at = created_at;
        }
        batch.results.push(result);
    }

    batches
}
