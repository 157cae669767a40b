use anyhow::{Context, Result};
use clap::Parser;

use llm_console::api::{ApiError, ChatRequest, Client, EvalRunRequest, ImageAttachment};
use llm_console::cli::{Args, Command, EvalCommand, PresetArg, ScoringArg, UseCaseArg, parse_score_spec};
use llm_console::models::{ModelRef, ScoreEntry};
use llm_console::{catalog, display};

fn main() -> Result<()> {
    let args = Args::parse();
    let client = Client::new(&args.base_url);

    match args.command {
        Command::Models => display::print_models(args.json),
        Command::Chat {
            prompt,
            provider,
            use_case,
            auto_select,
            image,
        } => {
            if use_case == UseCaseArg::Vision && image.is_none() {
                return Err(ApiError::validation("the vision use case requires --image").into());
            }
            let request = ChatRequest {
                provider,
                use_case: use_case.workload_key().to_string(),
                prompt,
                auto_select: auto_select.then_some(true),
            };
            let outcome = match image {
                Some(path) => {
                    let attachment = ImageAttachment::from_path(&path)
                        .with_context(|| format!("could not read image {}", path.display()))?;
                    client.run_chat_vision(&request, &attachment)?
                }
                None => client.run_chat(&request)?,
            };
            display::print_chat(&outcome, args.json);
        }
        Command::Analytics => {
            let snapshot = client.fetch_analytics()?;
            display::print_analytics(&snapshot, args.json);
        }
        Command::Eval(cmd) => run_eval(&client, cmd, args.json)?,
    }

    Ok(())
}

fn run_eval(client: &Client, cmd: EvalCommand, json_out: bool) -> Result<()> {
    match cmd {
        EvalCommand::Run {
            prompts,
            models,
            criteria,
            preset,
            scoring,
            judge,
        } => {
            let models = models
                .iter()
                .map(|id| resolve_model(id))
                .collect::<Result<Vec<_>, _>>()?;
            let (judge_model, judge_provider) = match scoring {
                ScoringArg::Ai => {
                    let judge = resolve_model(&judge)?;
                    (Some(judge.model_id), Some(judge.provider))
                }
                ScoringArg::Manual => (None, None),
            };
            let request = EvalRunRequest {
                prompts,
                models,
                criteria: effective_criteria(criteria, preset),
                scoring_type: scoring.wire_name().to_string(),
                judge_model,
                judge_provider,
            };
            let run = client.run_evaluation(&request)?;
            display::print_eval_run(&run, json_out);
        }
        EvalCommand::Score {
            prompt,
            response,
            criteria,
            preset,
            judge,
        } => {
            let judge = resolve_model(&judge)?;
            let scores =
                client.score_with_judge(&prompt, &response, &effective_criteria(criteria, preset), &judge)?;
            if json_out {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else {
                display::print_ai_scores(&scores, 0);
            }
        }
        EvalCommand::Save {
            prompt,
            model,
            scores,
        } => {
            let model = resolve_model(&model)?;
            let entries = scores
                .iter()
                .map(|spec| {
                    parse_score_spec(spec).map(|(metric, score, comment)| ScoreEntry {
                        metric,
                        score: Some(score),
                        comment,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(ApiError::validation)?;
            let avg = client.save_manual_scores(&prompt, &model, &entries)?;
            if json_out {
                println!("{}", serde_json::json!({ "avg_score": avg }));
            } else {
                println!("saved {} scores, average {avg:.2}", entries.len());
            }
        }
        EvalCommand::History { batch } => {
            let batches = client.fetch_evaluation_history()?;
            match batch {
                Some(id) => {
                    let batch = batches
                        .iter()
                        .find(|b| b.batch_id == id)
                        .ok_or_else(|| ApiError::validation(format!("no batch '{id}' in history")))?;
                    display::print_history_batch(batch, json_out);
                }
                None => display::print_history(&batches, json_out),
            }
        }
    }
    Ok(())
}

fn effective_criteria(criteria: Vec<String>, preset: PresetArg) -> Vec<String> {
    if criteria.is_empty() {
        preset.metrics().iter().map(|m| m.to_string()).collect()
    } else {
        criteria
    }
}

fn resolve_model(id: &str) -> Result<ModelRef, ApiError> {
    catalog::find_model(id)
        .map(|m| ModelRef {
            provider: m.provider.to_string(),
            model_id: m.model_id.to_string(),
            display_name: Some(m.display_name.to_string()),
        })
        .ok_or_else(|| {
            ApiError::validation(format!("unknown model id '{id}' (see `console models`)"))
        })
}
