//! # Model Catalog
//!
//! The static registry of known models, mirroring the backend's model
//! registry: capability flags, cost per 1k tokens, typical latency, quality
//! score, and context window. Loaded once, never mutated.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Capability flags for one catalog entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub reasoning: bool,
    pub coding: bool,
    pub tool_calling: bool,
    pub summarization: bool,
    pub structured_output: bool,
    pub rag: bool,
    pub vision: bool,
    pub multimodality: bool,
}

/// Capability names in badge order, matching the flag order in
/// [`Capabilities`].
pub const CAPABILITY_KEYS: [&str; 8] = [
    "reasoning",
    "coding",
    "tool_calling",
    "summarization",
    "structured_output",
    "rag",
    "vision",
    "multimodality",
];

impl Capabilities {
    fn flags(&self) -> [bool; 8] {
        [
            self.reasoning,
            self.coding,
            self.tool_calling,
            self.summarization,
            self.structured_output,
            self.rag,
            self.vision,
            self.multimodality,
        ]
    }
}

/// A catalog row. Static data, declaration order is the canonical order.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub model_id: &'static str,
    pub provider: &'static str,
    pub display_name: &'static str,
    #[serde(flatten)]
    pub capabilities: Capabilities,
    pub latency_ms: u64,
    pub cost_per_1k: f64,
    pub quality_score: f64,
    pub context_window: u64,
}

#[allow(clippy::too_many_arguments)]
const fn caps(
    reasoning: bool,
    coding: bool,
    tool_calling: bool,
    summarization: bool,
    structured_output: bool,
    rag: bool,
    vision: bool,
    multimodality: bool,
) -> Capabilities {
    Capabilities {
        reasoning,
        coding,
        tool_calling,
        summarization,
        structured_output,
        rag,
        vision,
        multimodality,
    }
}

const ALL: Capabilities = caps(true, true, true, true, true, true, true, true);

/// The full catalog. Order matters: grouping helpers preserve it.
pub const MODEL_CATALOG: &[ModelEntry] = &[
    // Google
    ModelEntry {
        model_id: "gemini-2.5-pro",
        provider: "Google",
        display_name: "Gemini 2.5 Pro",
        capabilities: ALL,
        latency_ms: 2200,
        cost_per_1k: 0.01125,
        quality_score: 4.7,
        context_window: 1_048_576,
    },
    ModelEntry {
        model_id: "gemini-2.5-flash",
        provider: "Google",
        display_name: "Gemini 2.5 Flash",
        capabilities: ALL,
        latency_ms: 800,
        cost_per_1k: 0.0015,
        quality_score: 4.2,
        context_window: 1_048_576,
    },
    ModelEntry {
        model_id: "gemini-1.5-flash-8b",
        provider: "Google",
        display_name: "Gemini 1.5 Flash-8B",
        capabilities: caps(false, false, false, true, true, false, false, false),
        latency_ms: 400,
        cost_per_1k: 0.0003,
        quality_score: 3.5,
        context_window: 1_048_576,
    },
    // OpenAI
    ModelEntry {
        model_id: "gpt-4o",
        provider: "OpenAI",
        display_name: "GPT-4o",
        capabilities: ALL,
        latency_ms: 1500,
        cost_per_1k: 0.01,
        quality_score: 4.5,
        context_window: 128_000,
    },
    ModelEntry {
        model_id: "gpt-4o-mini",
        provider: "OpenAI",
        display_name: "GPT-4o Mini",
        capabilities: caps(true, true, true, true, true, true, true, false),
        latency_ms: 600,
        cost_per_1k: 0.00015,
        quality_score: 3.8,
        context_window: 128_000,
    },
    ModelEntry {
        model_id: "o1-preview",
        provider: "OpenAI",
        display_name: "o1 Preview",
        capabilities: caps(true, true, false, true, true, true, false, false),
        latency_ms: 5000,
        cost_per_1k: 0.015,
        quality_score: 4.8,
        context_window: 128_000,
    },
    ModelEntry {
        model_id: "o1-mini",
        provider: "OpenAI",
        display_name: "o1 Mini",
        capabilities: caps(true, true, false, true, true, true, false, false),
        latency_ms: 1500,
        cost_per_1k: 0.003,
        quality_score: 4.4,
        context_window: 128_000,
    },
    // Meta
    ModelEntry {
        model_id: "meta/llama-3.3-70b-instruct-maas",
        provider: "Meta",
        display_name: "Llama 3.3 70B Instruct",
        capabilities: caps(true, true, true, true, true, true, false, false),
        latency_ms: 1200,
        cost_per_1k: 0.0006,
        quality_score: 4.0,
        context_window: 131_072,
    },
    ModelEntry {
        model_id: "meta/llama-4-scout-17b-16e-instruct-maas",
        provider: "Meta",
        display_name: "Llama 4 Scout 17B",
        capabilities: caps(true, true, false, true, false, false, true, true),
        latency_ms: 900,
        cost_per_1k: 0.0004,
        quality_score: 3.6,
        context_window: 131_072,
    },
    // Amazon
    ModelEntry {
        model_id: "amazon.nova-pro-v1:0",
        provider: "Amazon",
        display_name: "Nova Pro",
        capabilities: ALL,
        latency_ms: 1400,
        cost_per_1k: 0.0008,
        quality_score: 4.1,
        context_window: 128_000,
    },
    ModelEntry {
        model_id: "amazon.nova-lite-v1:0",
        provider: "Amazon",
        display_name: "Nova Lite",
        capabilities: caps(false, false, false, true, true, true, true, false),
        latency_ms: 500,
        cost_per_1k: 0.0002,
        quality_score: 3.4,
        context_window: 128_000,
    },
    ModelEntry {
        model_id: "amazon.nova-micro-v1:0",
        provider: "Amazon",
        display_name: "Nova Micro",
        capabilities: caps(false, false, false, true, false, false, false, false),
        latency_ms: 300,
        cost_per_1k: 0.0001,
        quality_score: 2.8,
        context_window: 128_000,
    },
    // Mistral AI
    ModelEntry {
        model_id: "mistral.mistral-large-2402-v1:0",
        provider: "Mistral AI",
        display_name: "Mistral Large",
        capabilities: caps(true, true, true, true, true, true, false, false),
        latency_ms: 1800,
        cost_per_1k: 0.008,
        quality_score: 4.3,
        context_window: 32_000,
    },
    ModelEntry {
        model_id: "mistral.mistral-small-2402-v1:0",
        provider: "Mistral AI",
        display_name: "Mistral Small",
        capabilities: caps(false, false, true, true, true, false, false, false),
        latency_ms: 600,
        cost_per_1k: 0.002,
        quality_score: 3.5,
        context_window: 32_000,
    },
    ModelEntry {
        model_id: "us.mistral.pixtral-large-2502-v1:0",
        provider: "Mistral AI",
        display_name: "Pixtral Large",
        capabilities: caps(true, true, false, true, false, false, true, true),
        latency_ms: 2000,
        cost_per_1k: 0.012,
        quality_score: 4.0,
        context_window: 128_000,
    },
    // DeepSeek
    ModelEntry {
        model_id: "deepseek-ai/deepseek-r1-0528-maas",
        provider: "DeepSeek",
        display_name: "DeepSeek R1",
        capabilities: caps(true, true, false, true, true, false, false, false),
        latency_ms: 3000,
        cost_per_1k: 0.0014,
        quality_score: 4.4,
        context_window: 65_536,
    },
    ModelEntry {
        model_id: "deepseek-ai/deepseek-v3.2-maas",
        provider: "DeepSeek",
        display_name: "DeepSeek V3.2",
        capabilities: caps(true, true, true, true, true, true, false, false),
        latency_ms: 1000,
        cost_per_1k: 0.00027,
        quality_score: 4.1,
        context_window: 65_536,
    },
];

static BY_PROVIDER: Lazy<Vec<(&'static str, Vec<&'static ModelEntry>)>> = Lazy::new(|| {
    let mut grouped: Vec<(&'static str, Vec<&'static ModelEntry>)> = Vec::new();
    for entry in MODEL_CATALOG {
        match grouped.iter_mut().find(|(p, _)| *p == entry.provider) {
            Some((_, models)) => models.push(entry),
            None => grouped.push((entry.provider, vec![entry])),
        }
    }
    grouped
});

/// All known models in declaration order.
pub fn list_models() -> &'static [ModelEntry] {
    MODEL_CATALOG
}

/// Models grouped by provider. Provider order follows first occurrence in the
/// catalog; catalog order is preserved within each group.
pub fn models_by_provider() -> &'static [(&'static str, Vec<&'static ModelEntry>)] {
    &BY_PROVIDER
}

/// Names of the capabilities an entry actually has.
pub fn capability_badges(entry: &ModelEntry) -> Vec<&'static str> {
    CAPABILITY_KEYS
        .iter()
        .zip(entry.capabilities.flags())
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect()
}

/// Exact lookup by model id.
pub fn find_model(model_id: &str) -> Option<&'static ModelEntry> {
    MODEL_CATALOG.iter().find(|m| m.model_id == model_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_declaration_order() {
        let models = list_models();
        assert_eq!(models[0].model_id, "gemini-2.5-pro");
        assert_eq!(models.last().unwrap().model_id, "deepseek-ai/deepseek-v3.2-maas");
    }

    #[test]
    fn grouping_preserves_catalog_order() {
        let grouped = models_by_provider();
        let providers: Vec<&str> = grouped.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            providers,
            ["Google", "OpenAI", "Meta", "Amazon", "Mistral AI", "DeepSeek"]
        );
        let (_, google) = &grouped[0];
        assert_eq!(google[0].model_id, "gemini-2.5-pro");
        assert_eq!(google.len(), 3);
    }

    #[test]
    fn badges_match_flags() {
        let micro = find_model("amazon.nova-micro-v1:0").unwrap();
        assert_eq!(capability_badges(micro), ["summarization"]);

        let pro = find_model("gemini-2.5-pro").unwrap();
        assert_eq!(capability_badges(pro).len(), CAPABILITY_KEYS.len());
    }

    #[test]
    fn unknown_model_is_none() {
        assert!(find_model("no-such-model").is_none());
    }
}
