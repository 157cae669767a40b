pub mod chat;
pub mod evaluation;
pub mod record;
pub(crate) mod wire;

pub use chat::{ChatOutcome, UsageMetrics};
pub use evaluation::{
    AiScore, EvaluationBatch, EvaluationResult, ManualScores, ModelRef, PromptQuality,
    ScoreEntry, group_batches,
};
pub use record::RequestRecord;
