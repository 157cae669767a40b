use crate::api::DEFAULT_BASE_URL;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCaseArg {
    /// General chat and reasoning
    Chat,
    /// Code generation and review
    Code,
    /// Retrieval-augmented answering
    Rag,
    /// Image understanding (requires --image)
    Vision,
    /// Long-document summarization
    Summarization,
}

impl UseCaseArg {
    /// The backend routes on coarse workload keys, not on the full use-case
    /// taxonomy.
    pub fn workload_key(self) -> &'static str {
        match self {
            UseCaseArg::Vision => "vision",
            UseCaseArg::Rag | UseCaseArg::Summarization => "summarization",
            UseCaseArg::Chat | UseCaseArg::Code => "reasoning",
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringArg {
    /// Score responses by hand after the run
    Manual,
    /// Let a judge model score each response
    Ai,
}

impl ScoringArg {
    pub fn wire_name(self) -> &'static str {
        match self {
            ScoringArg::Manual => "Manual",
            ScoringArg::Ai => "AI",
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    /// Correctness, Relevance, Clarity, Completeness
    GeneralQuality,
    /// Safety, Bias, Toxicity, Compliance
    SafetyCompliance,
    /// Correctness, Efficiency, Readability, Best Practices
    CodeGeneration,
    /// Accuracy, Conciseness, Coverage, Coherence
    Summarization,
    /// Creativity, Originality, Engagement, Style
    CreativeWriting,
    /// Faithfulness, Relevance, Completeness, Citation Quality
    Rag,
}

impl PresetArg {
    pub fn metrics(self) -> &'static [&'static str] {
        match self {
            PresetArg::GeneralQuality => {
                &["Correctness", "Relevance", "Clarity", "Completeness"]
            }
            PresetArg::SafetyCompliance => &["Safety", "Bias", "Toxicity", "Compliance"],
            PresetArg::CodeGeneration => {
                &["Correctness", "Efficiency", "Readability", "Best Practices"]
            }
            PresetArg::Summarization => &["Accuracy", "Conciseness", "Coverage", "Coherence"],
            PresetArg::CreativeWriting => &["Creativity", "Originality", "Engagement", "Style"],
            PresetArg::Rag => {
                &["Faithfulness", "Relevance", "Completeness", "Citation Quality"]
            }
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(name = "console", about = "Terminal console for the LLM governance backend")]
pub struct Args {
    /// Backend base URL
    #[arg(long, env = "LLM_CONSOLE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Emit JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// List the model catalog, grouped by provider
    Models,
    /// Send one prompt through the playground
    Chat {
        /// The prompt to send
        prompt: String,

        /// Provider to route to (ignored with --auto-select)
        #[arg(long, default_value = "Google")]
        provider: String,

        /// Workload category for routing and telemetry
        #[arg(long, value_enum, default_value_t = UseCaseArg::Chat)]
        use_case: UseCaseArg,

        /// Let the backend classify the prompt and pick the model
        #[arg(long)]
        auto_select: bool,

        /// Attach an image (switches to the vision endpoint)
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Usage and cost analytics from the backend's request log
    Analytics,
    /// Evaluation runs, scoring, and history
    #[command(subcommand)]
    Eval(EvalCommand),
}

#[derive(clap::Subcommand, Debug)]
pub enum EvalCommand {
    /// Run every prompt against every selected model
    Run {
        /// Prompt to evaluate (repeatable)
        #[arg(long = "prompt", required = true)]
        prompts: Vec<String>,

        /// Model id to evaluate (repeatable, must be in the catalog)
        #[arg(long = "model", required = true)]
        models: Vec<String>,

        /// Scoring metric (repeatable, overrides --preset)
        #[arg(long = "criteria")]
        criteria: Vec<String>,

        /// Named metric preset
        #[arg(long, value_enum, default_value_t = PresetArg::GeneralQuality)]
        preset: PresetArg,

        /// How responses get scored
        #[arg(long, value_enum, default_value_t = ScoringArg::Manual)]
        scoring: ScoringArg,

        /// Judge model id for AI scoring
        #[arg(long, default_value = "gemini-2.5-flash")]
        judge: String,
    },
    /// Score one response with the judge model
    Score {
        /// The prompt that produced the response
        #[arg(long)]
        prompt: String,

        /// The response text to score
        #[arg(long)]
        response: String,

        /// Scoring metric (repeatable)
        #[arg(long = "criteria")]
        criteria: Vec<String>,

        /// Named metric preset
        #[arg(long, value_enum, default_value_t = PresetArg::GeneralQuality)]
        preset: PresetArg,

        /// Judge model id
        #[arg(long, default_value = "gemini-2.5-flash")]
        judge: String,
    },
    /// Save manual scores for one (prompt, model) result
    Save {
        /// The prompt that was evaluated
        #[arg(long)]
        prompt: String,

        /// Model id the scores belong to
        #[arg(long)]
        model: String,

        /// Score as metric=N or metric=N:comment (repeatable, N in 1-5)
        #[arg(long = "score", required = true)]
        scores: Vec<String>,
    },
    /// Past evaluation runs, newest first
    History {
        /// Show only this batch in full
        #[arg(long)]
        batch: Option<String>,
    },
}

/// Parse a `metric=N` or `metric=N:comment` score spec.
pub fn parse_score_spec(spec: &str) -> Result<(String, u8, String), String> {
    let (metric, rest) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid score '{spec}': expected metric=N or metric=N:comment"))?;
    let metric = metric.trim();
    if metric.is_empty() {
        return Err(format!("invalid score '{spec}': empty metric name"));
    }
    let (value, comment) = match rest.split_once(':') {
        Some((v, c)) => (v, c.trim()),
        None => (rest, ""),
    };
    let score: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{spec}': '{}' is not a number", value.trim()))?;
    if !(1..=5).contains(&score) {
        return Err(format!("invalid score '{spec}': score must be 1-5"));
    }
    Ok((metric.to_string(), score, comment.to_string()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    #[serial_test::serial]
    fn base_url_resolves_env_then_default() {
        // SAFETY: Test runs serially, no concurrent env access
        unsafe { std::env::set_var("LLM_CONSOLE_BASE_URL", "https://example.test/api") };
        let args = Args::parse_from(["console", "models"]);
        assert_eq!(args.base_url, "https://example.test/api");
        unsafe { std::env::remove_var("LLM_CONSOLE_BASE_URL") };

        let args = Args::parse_from(["console", "models"]);
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn workload_keys_collapse_the_taxonomy() {
        assert_eq!(UseCaseArg::Chat.workload_key(), "reasoning");
        assert_eq!(UseCaseArg::Code.workload_key(), "reasoning");
        assert_eq!(UseCaseArg::Rag.workload_key(), "summarization");
        assert_eq!(UseCaseArg::Summarization.workload_key(), "summarization");
        assert_eq!(UseCaseArg::Vision.workload_key(), "vision");
    }

    #[test]
    fn score_specs_parse() {
        assert_eq!(
            parse_score_spec("Correctness=4").unwrap(),
            ("Correctness".to_string(), 4, String::new())
        );
        assert_eq!(
            parse_score_spec("Clarity=5:crisp and direct").unwrap(),
            ("Clarity".to_string(), 5, "crisp and direct".to_string())
        );
    }

    #[test]
    fn bad_score_specs_are_rejected() {
        assert!(parse_score_spec("Correctness").is_err());
        assert!(parse_score_spec("=4").is_err());
        assert!(parse_score_spec("Clarity=six").is_err());
        assert!(parse_score_spec("Clarity=0").is_err());
        assert!(parse_score_spec("Clarity=6").is_err());
    }

    #[test]
    fn presets_carry_four_metrics() {
        assert_eq!(
            PresetArg::GeneralQuality.metrics(),
            ["Correctness", "Relevance", "Clarity", "Completeness"]
        );
        assert_eq!(PresetArg::Rag.metrics().len(), 4);
    }
}
