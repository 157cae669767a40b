//! HTTP client for the governance backend.
//!
//! All calls are blocking JSON-over-HTTP against a single base URL supplied
//! by the caller (the CLI resolves `--base-url` / `LLM_CONSOLE_BASE_URL`).
//! No retries and no cancellation: a call resolves or fails once, and every
//! failure is terminal for that invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    AiScore, ChatOutcome, EvaluationBatch, EvaluationResult, ManualScores, ModelRef,
    PromptQuality, RequestRecord, ScoreEntry, UsageMetrics, group_batches,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// What went wrong with one backend call.
///
/// Client-side validation failures block the call before any network I/O;
/// the other variants map a transport failure, a non-success status (whose
/// `detail` message is surfaced verbatim when present), or an unreadable
/// response body.
#[derive(Debug)]
pub enum ApiError {
    Transport(Box<ureq::Error>),
    Status { status: u16, detail: Option<String> },
    Decode(std::io::Error),
    Validation(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "request failed: {e}"),
            ApiError::Status { status, detail } => match detail {
                Some(d) => f.write_str(d),
                None => write!(f, "request failed (HTTP {status})"),
            },
            ApiError::Decode(e) => write!(f, "invalid response body: {e}"),
            ApiError::Validation(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// A playground chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub provider: String,
    pub use_case: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_select: Option<bool>,
}

/// An image attached to a vision chat request.
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(ImageAttachment { file_name, bytes })
    }

    fn mime(&self) -> &'static str {
        match self.file_name.rsplit('.').next() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Everything `GET /api/analytics` returns: the raw records plus the
/// backend's precomputed totals.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsSnapshot {
    #[serde(rename = "data")]
    pub records: Vec<RequestRecord>,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_input_tokens: u64,
    #[serde(default)]
    pub total_output_tokens: u64,
}

/// Parameters for `POST /api/eval/run`.
#[derive(Debug, Clone, Serialize)]
pub struct EvalRunRequest {
    pub prompts: Vec<String>,
    pub models: Vec<ModelRef>,
    pub criteria: Vec<String>,
    pub scoring_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_provider: Option<String>,
}

/// A completed evaluation run. `summary_metrics` from the wire is dropped:
/// per-model aggregates are recomputed client-side so history-loaded and
/// fresh-run batches render identically.
///
/// Manual runs have no judge, and the backend sends each prompt's metadata
/// as an explicit `null` rather than omitting the key.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalRun {
    pub results: Vec<EvaluationResult>,
    #[serde(default)]
    pub prompt_metadata: BTreeMap<String, Option<PromptQuality>>,
}

#[derive(Deserialize)]
struct AiScoreResponse {
    #[serde(default)]
    ai_evaluation: Vec<AiScore>,
}

#[derive(Serialize)]
struct AiScoreRequest<'a> {
    prompt: &'a str,
    response: &'a str,
    metrics: &'a [String],
    judge_model: &'a str,
    judge_provider: &'a str,
}

#[derive(Serialize)]
struct SaveScoresRequest<'a> {
    prompt: &'a str,
    provider: &'a str,
    model_id: &'a str,
    scores: &'a [ScoreEntry],
}

#[derive(Deserialize)]
struct SaveScoresResponse {
    #[serde(default)]
    avg_score: f64,
}

/// One flat row from `GET /api/evaluation/history`. Metrics live at the top
/// level here, unlike the nested shape `/api/eval/run` returns.
#[derive(Deserialize)]
struct HistoryRow {
    #[serde(default)]
    batch_id: Option<String>,
    #[serde(default, deserialize_with = "crate::models::wire::opt_datetime")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model_id: String,
    #[serde(default)]
    response: String,
    #[serde(flatten)]
    metrics: UsageMetrics,
    #[serde(default)]
    scores: Option<ManualScores>,
    #[serde(default)]
    ai_evaluations: Option<Vec<AiScore>>,
    #[serde(default)]
    prompt_quality: Option<PromptQuality>,
}

impl HistoryRow {
    fn into_parts(self) -> (String, Option<DateTime<Utc>>, EvaluationResult) {
        let batch_id = self.batch_id.unwrap_or_else(|| "unbatched".to_string());
        let result = EvaluationResult {
            prompt: self.prompt,
            provider: self.provider,
            model_id: self.model_id,
            response: self.response,
            metrics: self.metrics,
            scores: self.scores,
            ai_evaluations: self.ai_evaluations,
            prompt_quality: self.prompt_quality,
        };
        (batch_id, self.created_at, result)
    }
}

/// Blocking client for the backend API.
pub struct Client {
    agent: ureq::Agent,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Client {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_err(err: ureq::Error) -> ApiError {
        match err {
            ureq::Error::Status(status, response) => {
                let detail = response
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<Value>(&body).ok())
                    .and_then(|v| {
                        v.get("detail")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    });
                ApiError::Status { status, detail }
            }
            other => ApiError::Transport(Box::new(other)),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .agent
            .get(&self.url(path))
            .set("Accept", "application/json")
            .call()
            .map_err(Self::map_err)?;
        response.into_json::<T>().map_err(ApiError::Decode)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .agent
            .post(&self.url(path))
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(Self::map_err)?;
        response.into_json::<T>().map_err(ApiError::Decode)
    }

    /// `POST /api/chat`
    pub fn run_chat(&self, request: &ChatRequest) -> Result<ChatOutcome, ApiError> {
        self.post_json("/chat", request)
    }

    /// `POST /api/chat/vision` (multipart)
    pub fn run_chat_vision(
        &self,
        request: &ChatRequest,
        image: &ImageAttachment,
    ) -> Result<ChatOutcome, ApiError> {
        let boundary = format!("llm-console-{}", Utc::now().timestamp_nanos_opt().unwrap_or(0));
        let body = multipart_body(
            &boundary,
            &[
                ("provider", &request.provider),
                ("use_case", &request.use_case),
                ("prompt", &request.prompt),
            ],
            image,
        );
        let response = self
            .agent
            .post(&self.url("/chat/vision"))
            .set("Accept", "application/json")
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(Self::map_err)?;
        response.into_json::<ChatOutcome>().map_err(ApiError::Decode)
    }

    /// `GET /api/analytics`
    pub fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, ApiError> {
        self.get_json("/analytics")
    }

    /// `POST /api/eval/run`
    pub fn run_evaluation(&self, request: &EvalRunRequest) -> Result<EvalRun, ApiError> {
        if request.models.is_empty() {
            return Err(ApiError::validation(
                "at least one model must be selected for evaluation",
            ));
        }
        if request.prompts.iter().all(|p| p.trim().is_empty()) {
            return Err(ApiError::validation(
                "at least one non-empty prompt is required",
            ));
        }
        self.post_json("/eval/run", request)
    }

    /// `POST /api/eval/ai-score`
    pub fn score_with_judge(
        &self,
        prompt: &str,
        response: &str,
        metrics: &[String],
        judge: &ModelRef,
    ) -> Result<Vec<AiScore>, ApiError> {
        let request = AiScoreRequest {
            prompt,
            response,
            metrics,
            judge_model: &judge.model_id,
            judge_provider: &judge.provider,
        };
        let decoded: AiScoreResponse = self.post_json("/eval/ai-score", &request)?;
        Ok(decoded.ai_evaluation)
    }

    /// `POST /api/eval/save-scores`; returns the backend's average score.
    pub fn save_manual_scores(
        &self,
        prompt: &str,
        model: &ModelRef,
        scores: &[ScoreEntry],
    ) -> Result<f64, ApiError> {
        let request = SaveScoresRequest {
            prompt,
            provider: &model.provider,
            model_id: &model.model_id,
            scores,
        };
        let decoded: SaveScoresResponse = self.post_json("/eval/save-scores", &request)?;
        Ok(decoded.avg_score)
    }

    /// `GET /api/evaluation/history`, grouped into batches client-side.
    pub fn fetch_evaluation_history(&self) -> Result<Vec<EvaluationBatch>, ApiError> {
        let rows: Vec<HistoryRow> = self.get_json("/evaluation/history")?;
        Ok(group_batches(
            rows.into_iter().map(HistoryRow::into_parts).collect(),
        ))
    }
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)], image: &ImageAttachment) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            image.file_name,
            image.mime()
        )
        .as_bytes(),
    );
    body.extend_from_slice(&image.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
