use llm_console::aggregate::{UNKNOWN_KEY, by_eval_model, by_model, by_provider, by_use_case};
use llm_console::models::{EvaluationResult, RequestRecord, UsageMetrics};

fn create_test_record(
    provider: Option<&str>,
    model_id: Option<&str>,
    use_case: Option<&str>,
    input: u64,
    output: u64,
    cost: f64,
    latency_ms: u64,
) -> RequestRecord {
    RequestRecord {
        provider: provider.map(str::to_string),
        model_id: model_id.map(str::to_string),
        use_case: use_case.map(str::to_string),
        input_tokens: input,
        output_tokens: output,
        cost,
        latency_ms,
        created_at: None,
    }
}

fn sample_records() -> Vec<RequestRecord> {
    vec![
        create_test_record(
            Some("OpenAI"),
            Some("gpt-4o"),
            Some("reasoning"),
            100,
            200,
            0.01,
            100,
        ),
        create_test_record(
            Some("OpenAI"),
            Some("gpt-4o-mini"),
            Some("summarization"),
            50,
            50,
            0.02,
            300,
        ),
        create_test_record(
            Some("Google"),
            Some("gemini-2.5-flash"),
            Some("reasoning"),
            10,
            20,
            0.005,
            50,
        ),
        create_test_record(None, None, None, 5, 5, 0.001, 10),
    ]
}

#[test]
fn test_summed_cost_is_conserved() {
    let records = sample_records();
    let total: f64 = records.iter().map(|r| r.cost).sum();

    for groups in [
        by_provider(&records),
        by_use_case(&records),
        by_model(&records),
    ] {
        let grouped: f64 = groups.iter().map(|g| g.cost).sum();
        assert!(
            (grouped - total).abs() < 1e-12,
            "grouped cost {grouped} != total {total}"
        );
        let requests: u64 = groups.iter().map(|g| g.requests).sum();
        assert_eq!(requests, records.len() as u64);
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let records = sample_records();
    let first = by_provider(&records);
    let second = by_provider(&records);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.key, b.key);
        assert_eq!(a.requests, b.requests);
        assert_eq!(a.cost, b.cost);
    }
}

#[test]
fn test_grouping_one_record_per_key_is_idempotent() {
    let records = sample_records();
    let groups = by_provider(&records);

    // Turn each group back into a single record and regroup by the same key.
    let regrouped_input: Vec<RequestRecord> = groups
        .iter()
        .map(|g| {
            create_test_record(
                Some(&g.key),
                None,
                None,
                g.input_tokens,
                g.output_tokens,
                g.cost,
                g.total_latency_ms,
            )
        })
        .collect();
    let regrouped = by_provider(&regrouped_input);

    assert_eq!(regrouped.len(), groups.len());
    for (a, b) in regrouped.iter().zip(&groups) {
        assert_eq!(a.key, b.key);
        assert_eq!(a.input_tokens, b.input_tokens);
        assert_eq!(a.output_tokens, b.output_tokens);
        assert!((a.cost - b.cost).abs() < 1e-12);
        assert_eq!(a.total_latency_ms, b.total_latency_ms);
    }
}

#[test]
fn test_missing_fields_land_in_unknown() {
    let records = sample_records();

    let provider_groups = by_provider(&records);
    let providers: Vec<&str> = provider_groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(providers, ["OpenAI", "Google", UNKNOWN_KEY]);

    let use_case_groups = by_use_case(&records);
    let use_cases: Vec<&str> = use_case_groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(use_cases, ["reasoning", "summarization", UNKNOWN_KEY]);
}

#[test]
fn test_token_totals_and_cost_per_request() {
    let records = sample_records();
    let groups = by_provider(&records);
    let openai = &groups[0];
    assert_eq!(openai.input_tokens, 150);
    assert_eq!(openai.output_tokens, 250);
    assert_eq!(openai.total_tokens(), 400);
    assert!((openai.cost_per_request() - 0.015).abs() < 1e-12);
    assert_eq!(openai.avg_latency_ms(), 200);
}

#[test]
fn test_eval_results_group_by_provider_and_model() {
    let result = |provider: Option<&str>, model: &str, cost: f64| EvaluationResult {
        prompt: "p".to_string(),
        provider: provider.map(str::to_string),
        model_id: model.to_string(),
        response: String::new(),
        metrics: UsageMetrics {
            input_tokens: 1,
            output_tokens: 1,
            cost,
            latency_ms: 100,
        },
        scores: None,
        ai_evaluations: None,
        prompt_quality: None,
    };

    let results = vec![
        result(Some("Google"), "gemini-2.5-flash", 0.001),
        result(Some("Google"), "gemini-2.5-flash", 0.003),
        result(None, "mystery-model", 0.002),
    ];
    let groups = by_eval_model(&results);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "Google:gemini-2.5-flash");
    assert_eq!(groups[0].requests, 2);
    assert!((groups[0].cost - 0.004).abs() < 1e-12);
    assert_eq!(groups[1].key, "Unknown:mystery-model");
}
