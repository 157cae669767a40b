use chrono::{DateTime, TimeZone, Utc};
use llm_console::aggregate::by_eval_model;
use llm_console::models::{EvaluationResult, group_batches};

fn parse_result(json: &str) -> EvaluationResult {
    serde_json::from_str(json).unwrap()
}

fn row(
    batch: &str,
    at: Option<DateTime<Utc>>,
    result: EvaluationResult,
) -> (String, Option<DateTime<Utc>>, EvaluationResult) {
    (batch.to_string(), at, result)
}

#[test]
fn test_batches_rebuild_newest_first_from_row_order() {
    let t1 = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
    let t0 = Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap();

    // The backend returns rows newest-first; grouping keeps that order.
    let rows = vec![
        row(
            "b-new",
            Some(t1),
            parse_result(r#"{"prompt":"P1","provider":"Google","model_id":"m1"}"#),
        ),
        row(
            "b-new",
            Some(t1),
            parse_result(r#"{"prompt":"P1","provider":"OpenAI","model_id":"m2"}"#),
        ),
        row(
            "b-old",
            Some(t0),
            parse_result(r#"{"prompt":"P0","provider":"Google","model_id":"m1"}"#),
        ),
    ];
    let batches = group_batches(rows);
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].batch_id, "b-new");
    assert_eq!(batches[0].created_at, Some(t1));
    assert_eq!(batches[0].results.len(), 2);
    assert_eq!(batches[0].title(), "P1");
    assert_eq!(batches[1].batch_id, "b-old");
}

#[test]
fn test_batch_timestamp_backfills_from_a_later_row() {
    let t = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
    let rows = vec![
        row(
            "b1",
            None,
            parse_result(r#"{"prompt":"P1","model_id":"m1"}"#),
        ),
        row(
            "b1",
            Some(t),
            parse_result(r#"{"prompt":"P1","model_id":"m2"}"#),
        ),
    ];
    let batches = group_batches(rows);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].created_at, Some(t));
}

#[test]
fn test_loaded_batch_aggregates_like_a_fresh_run() {
    let rows = vec![
        row(
            "b1",
            None,
            parse_result(
                r#"{"prompt":"P1","provider":"Google","model_id":"m1",
                    "metrics":{"input_tokens":10,"output_tokens":20,"cost":0.002,"latency_ms":400},
                    "scores":{"Correctness":4,"Clarity":0}}"#,
            ),
        ),
        row(
            "b1",
            None,
            parse_result(
                r#"{"prompt":"P2","provider":"Google","model_id":"m1",
                    "metrics":{"input_tokens":"30","output_tokens":"40","cost":"0.004","latency_ms":"600"}}"#,
            ),
        ),
    ];
    let batches = group_batches(rows);
    let results = &batches[0].results;

    assert_eq!(results[0].average_score(), Some(4.0));
    assert_eq!(results[1].average_score(), None);

    let groups = by_eval_model(results);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "Google:m1");
    assert_eq!(groups[0].requests, 2);
    assert_eq!(groups[0].avg_latency_ms(), 500);
    assert!((groups[0].cost - 0.006).abs() < 1e-12);
    assert_eq!(groups[0].total_tokens(), 100);
}

#[test]
fn test_rows_without_a_provider_stay_renderable() {
    let result = parse_result(r#"{"prompt":"P1","model_id":"m1"}"#);
    assert_eq!(result.model_ref().provider, "Unknown");
    assert_eq!(result.model_ref().summary_key(), "Unknown:m1");
    assert!(!result.has_any_score());
}
