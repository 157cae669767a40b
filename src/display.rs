//! Text and JSON rendering for every subcommand.
//!
//! Rendering is presentation only: everything here works from already-decoded
//! domain types and the aggregation helpers, and never talks to the network.

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

// Provide a no-op color shim when "colors" feature is disabled
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn bold(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn dimmed(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn green(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn yellow(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_white(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for &str {
        fn as_str(&self) -> &str {
            self
        }
    }
    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
    impl ColorizeShim for Plain {
        fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim as OwoColorize;

use serde_json::json;

use crate::aggregate::{self, Aggregate};
use crate::api::{AnalyticsSnapshot, EvalRun};
use crate::catalog;
use crate::matrix::EvalMatrix;
use crate::models::{AiScore, ChatOutcome, EvaluationBatch, EvaluationResult};
use crate::utils::{
    format_cost, format_timestamp, format_tokens, format_unit_cost, term_width, truncate, wrap,
};

const UNSET: &str = "--";

/// Color a 1-5 score by band: 4+ is good, 3 is middling, below is poor.
fn colored_score(v: f64) -> String {
    let text = format!("{v:.2}");
    if v >= 4.0 {
        text.green().to_string()
    } else if v >= 3.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn score_or_unset(v: Option<f64>) -> String {
    match v {
        Some(v) => colored_score(v),
        None => UNSET.dimmed().to_string(),
    }
}

/// Pad a colored cell to `width` from its visible length. Colored strings
/// carry escape bytes, so `{:<width$}` on them under-pads.
fn pad_cell(colored: &str, visible_len: usize, width: usize) -> String {
    format!("{colored}{}", " ".repeat(width.saturating_sub(visible_len)))
}

pub fn print_models(json_out: bool) {
    if json_out {
        let grouped: Vec<_> = catalog::models_by_provider()
            .iter()
            .map(|(provider, models)| json!({ "provider": provider, "models": models }))
            .collect();
        print_json(&json!({ "providers": grouped }));
        return;
    }

    for (provider, models) in catalog::models_by_provider() {
        println!("{}", provider.bold());
        for model in models {
            println!(
                "  {:<28} {:<44} {:>7}  {:>10}/1k  q{:.1}  {} ctx",
                model.display_name.cyan(),
                model.model_id.dimmed(),
                format!("{}ms", model.latency_ms),
                format_unit_cost(model.cost_per_1k),
                model.quality_score,
                format_tokens(model.context_window),
            );
            println!(
                "    {}",
                catalog::capability_badges(model).join(", ").dimmed()
            );
        }
        println!();
    }
}

pub fn print_chat(outcome: &ChatOutcome, json_out: bool) {
    if json_out {
        print_json(&json!(outcome));
        return;
    }

    let width = term_width().saturating_sub(2);
    for line in wrap(&outcome.response, width) {
        println!("{line}");
    }
    println!();
    println!(
        "{} {} {} {}",
        outcome.provider.bold(),
        outcome.model_id.cyan(),
        format!(
            "{} in / {} out",
            format_tokens(outcome.metrics.input_tokens),
            format_tokens(outcome.metrics.output_tokens)
        )
        .dimmed(),
        format!(
            "{} {}ms",
            format_unit_cost(outcome.metrics.cost),
            outcome.metrics.latency_ms
        )
        .dimmed(),
    );
    if !outcome.workload_tags.is_empty() {
        println!("{} {}", "tags:".dimmed(), outcome.workload_tags.join(", "));
    }
}

fn print_aggregate_table(title: &str, groups: &[Aggregate]) {
    if groups.is_empty() {
        return;
    }
    println!("{}", title.bold());
    println!(
        "  {:<24} {:>9} {:>12} {:>10} {:>10} {:>11} {:>12}",
        "", "Requests", "Avg Latency", "Input", "Output", "Cost", "$/req"
    );
    for g in groups {
        println!(
            "  {:<24} {:>9} {:>12} {:>10} {:>10} {:>11} {:>12}",
            truncate(&g.key, 24).cyan(),
            g.requests,
            format!("{}ms", g.avg_latency_ms()),
            format_tokens(g.input_tokens),
            format_tokens(g.output_tokens),
            format_cost(g.cost),
            format_unit_cost(g.cost_per_request()),
        );
    }
    println!();
}

pub fn print_analytics(snapshot: &AnalyticsSnapshot, json_out: bool) {
    let by_provider = aggregate::by_provider(&snapshot.records);
    let by_use_case = aggregate::by_use_case(&snapshot.records);
    let by_model = aggregate::by_model(&snapshot.records);

    if json_out {
        print_json(&json!({
            "total_requests": snapshot.total_requests,
            "total_cost": snapshot.total_cost,
            "total_input_tokens": snapshot.total_input_tokens,
            "total_output_tokens": snapshot.total_output_tokens,
            "by_provider": by_provider,
            "by_use_case": by_use_case,
            "by_model": by_model,
        }));
        return;
    }

    println!(
        "{}  {} requests  {}  {} in / {} out",
        "Usage".bold(),
        snapshot.total_requests,
        format_cost(snapshot.total_cost),
        format_tokens(snapshot.total_input_tokens),
        format_tokens(snapshot.total_output_tokens),
    );
    println!();

    print_aggregate_table("By provider", &by_provider);
    print_aggregate_table("By use case", &by_use_case);
    print_aggregate_table("By model", &by_model);

    let recent = snapshot.records.iter().take(10);
    let mut any = false;
    for record in recent {
        if !any {
            println!("{}", "Recent requests".bold());
            any = true;
        }
        println!(
            "  {}  {:<12} {:<36} {:>8} tok {:>12}",
            format_timestamp(record.created_at).dimmed(),
            record.provider.as_deref().unwrap_or(aggregate::UNKNOWN_KEY),
            truncate(record.model_id.as_deref().unwrap_or(UNSET), 36).cyan(),
            format_tokens(record.total_tokens()),
            format_unit_cost(record.cost),
        );
    }
}

fn print_results_grid(results: &[EvaluationResult]) {
    let matrix = EvalMatrix::build(results);
    if matrix.is_empty() {
        println!("{}", "no results".dimmed());
        return;
    }

    let label_width = 40;
    let col_width = 24;

    print!("{:<label_width$}", "");
    for model in matrix.models() {
        print!(
            " {}",
            format!("{:<col_width$}", truncate(model.label(), col_width)).bold()
        );
    }
    println!();

    for (row, prompt) in matrix.prompts().iter().enumerate() {
        print!("{:<label_width$}", truncate(prompt, label_width));
        for col in 0..matrix.models().len() {
            let (plain, colored) = match matrix.cell(row, col) {
                Some(result) => {
                    let meta = format!(
                        "{}ms {}",
                        result.metrics.latency_ms,
                        format_unit_cost(result.metrics.cost)
                    );
                    let (score_plain, score_colored) = match result.average_score() {
                        Some(s) => (format!("{s:.2}"), colored_score(s)),
                        None => (UNSET.to_string(), UNSET.dimmed().to_string()),
                    };
                    (
                        format!("{score_plain} {meta}"),
                        format!("{score_colored} {}", meta.dimmed()),
                    )
                }
                None => (UNSET.to_string(), UNSET.dimmed().to_string()),
            };
            print!(" {}", pad_cell(&colored, plain.chars().count(), col_width));
        }
        println!();
    }
    println!();

    // Per-model footer: average score over scored cells, mean latency/cost
    // over every run cell.
    let averages = matrix.model_average_scores();
    let aggregates = aggregate::by_eval_model(results);
    print!("{}", format!("{:<label_width$}", "Avg score").bold());
    for avg in &averages {
        let plain = match avg {
            Some(v) => format!("{v:.2}"),
            None => UNSET.to_string(),
        };
        print!(
            " {}",
            pad_cell(&score_or_unset(*avg), plain.chars().count(), col_width)
        );
    }
    println!();
    print!("{}", format!("{:<label_width$}", "Avg latency / cost").bold());
    for model in matrix.models() {
        let key = model.summary_key();
        let summary = aggregates
            .iter()
            .find(|a| a.key == key)
            .map(|a| {
                format!(
                    "{}ms {}",
                    a.avg_latency_ms(),
                    format_unit_cost(a.cost_per_request())
                )
            })
            .unwrap_or_else(|| UNSET.to_string());
        print!(" {}", format!("{summary:<col_width$}").dimmed());
    }
    println!();
}

fn print_responses(results: &[EvaluationResult]) {
    let width = term_width().saturating_sub(4).min(100);
    for result in results {
        println!(
            "{} {} {}",
            "#".dimmed(),
            result.model_ref().label().cyan(),
            truncate(&result.prompt, 60).dimmed()
        );
        for line in wrap(&result.response, width) {
            println!("  {line}");
        }
        if let Some(scores) = &result.scores {
            for (metric, score) in &scores.0 {
                let rendered = match score {
                    Some(s) => colored_score(f64::from(*s)),
                    None => UNSET.dimmed().to_string(),
                };
                println!("  {:<20} {rendered}", metric.dimmed());
            }
        }
        if let Some(evals) = &result.ai_evaluations {
            print_ai_scores(evals, 2);
        }
        println!();
    }
}

pub fn print_eval_run(run: &EvalRun, json_out: bool) {
    if json_out {
        print_json(&json!({
            "results": run.results,
            "prompt_metadata": run.prompt_metadata,
            "by_model": aggregate::by_eval_model(&run.results),
        }));
        return;
    }

    print_results_grid(&run.results);
    println!();

    // Manual runs carry null metadata per prompt; only judged prompts print.
    let mut printed_quality = false;
    for (prompt, quality) in &run.prompt_metadata {
        let Some(quality) = quality else { continue };
        let score = match quality.score {
            Some(s) => colored_score(f64::from(s)),
            None => UNSET.dimmed().to_string(),
        };
        println!(
            "{} {}  {score}  {}",
            "prompt".dimmed(),
            truncate(prompt, 50),
            quality.summary.dimmed()
        );
        if let Some(intent) = &quality.intent_detected {
            println!("  {} {intent}", "intent:".dimmed());
        }
        printed_quality = true;
    }
    if printed_quality {
        println!();
    }

    print_responses(&run.results);
}

pub fn print_ai_scores(scores: &[AiScore], indent: usize) {
    let pad = " ".repeat(indent);
    for entry in scores {
        let rendered = match entry.score {
            Some(s) => colored_score(f64::from(s)),
            None => UNSET.dimmed().to_string(),
        };
        println!("{pad}{:<20} {rendered}  {}", entry.metric, entry.reason.dimmed());
    }
}

pub fn print_history(batches: &[EvaluationBatch], json_out: bool) {
    if json_out {
        print_json(&json!({ "batches": batches }));
        return;
    }

    if batches.is_empty() {
        println!("{}", "no evaluation history".dimmed());
        return;
    }

    println!("{}", "Evaluation history".bold());
    for batch in batches {
        println!(
            "  {:<14} {}  {:>3} results  {}",
            truncate(&batch.batch_id, 14).cyan(),
            format_timestamp(batch.created_at).dimmed(),
            batch.results.len(),
            truncate(batch.title(), 50),
        );
    }
}

pub fn print_history_batch(batch: &EvaluationBatch, json_out: bool) {
    if json_out {
        print_json(&json!({
            "batch": batch,
            "by_model": aggregate::by_eval_model(&batch.results),
        }));
        return;
    }

    println!(
        "{} {}  {}",
        "Batch".bold(),
        batch.batch_id.cyan(),
        format_timestamp(batch.created_at).dimmed()
    );
    println!();
    print_results_grid(&batch.results);
    println!();
    print_responses(&batch.results);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(_) => println!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_padding_uses_visible_length() {
        // Escape bytes must not count toward the column width.
        let colored = "\u{1b}[32m4.50\u{1b}[0m";
        let padded = pad_cell(colored, 4, 10);
        assert!(padded.starts_with(colored));
        assert!(padded.ends_with(&" ".repeat(6)));
        assert_eq!(padded.chars().count(), colored.chars().count() + 6);
    }

    #[test]
    fn scored_and_absent_cells_pad_to_the_same_width() {
        let scored = pad_cell(&colored_score(4.5), 4, 24);
        let absent = pad_cell(&UNSET.dimmed().to_string(), UNSET.len(), 24);
        let visible = |s: &str| {
            let mut count = 0usize;
            let mut in_escape = false;
            for c in s.chars() {
                if in_escape {
                    if c.is_ascii_alphabetic() {
                        in_escape = false;
                    }
                } else if c == '\u{1b}' {
                    in_escape = true;
                } else {
                    count += 1;
                }
            }
            count
        };
        assert_eq!(visible(&scored), 24);
        assert_eq!(visible(&absent), 24);
    }

    #[test]
    fn overlong_cells_do_not_panic() {
        let padded = pad_cell("wider than the column", 21, 10);
        assert_eq!(padded, "wider than the column");
    }
}
