//! # Evaluation Matrix
//!
//! Reshapes a flat list of evaluation results into a prompt x model grid.
//! Rows are distinct prompts and columns distinct models, both in
//! first-occurrence order; a cell that was never run stays absent rather
//! than being filled with a zeroed placeholder.

use crate::models::{EvaluationResult, ModelRef};

pub struct EvalMatrix<'a> {
    prompts: Vec<&'a str>,
    models: Vec<ModelRef>,
    // Row-major: cells[row * models.len() + col]
    cells: Vec<Option<&'a EvaluationResult>>,
}

impl<'a> EvalMatrix<'a> {
    pub fn build(results: &'a [EvaluationResult]) -> Self {
        let mut prompts: Vec<&'a str> = Vec::new();
        let mut models: Vec<ModelRef> = Vec::new();

        for result in results {
            if !prompts.contains(&result.prompt.as_str()) {
                prompts.push(&result.prompt);
            }
            let model = result.model_ref();
            if !models.contains(&model) {
                models.push(model);
            }
        }

        let mut cells = vec![None; prompts.len() * models.len()];
        for result in results {
            let row = prompts
                .iter()
                .position(|p| *p == result.prompt)
                .unwrap_or(0);
            let col = models
                .iter()
                .position(|m| *m == result.model_ref())
                .unwrap_or(0);
            // A later duplicate of the same (prompt, model) pair replaces
            // the earlier one.
            cells[row * models.len() + col] = Some(result);
        }

        EvalMatrix {
            prompts,
            models,
            cells,
        }
    }

    pub fn prompts(&self) -> &[&'a str] {
        &self.prompts
    }

    pub fn models(&self) -> &[ModelRef] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The result for (prompt row, model column), if that pairing was run.
    pub fn cell(&self, row: usize, col: usize) -> Option<&'a EvaluationResult> {
        self.cells.get(row * self.models.len() + col).copied().flatten()
    }

    /// Per-column average manual score: the mean of each scored result's own
    /// per-metric mean. A model with no scored result has no average, which
    /// renders as a placeholder rather than 0.
    pub fn model_average_scores(&self) -> Vec<Option<f64>> {
        (0..self.models.len())
            .map(|col| {
                let scored: Vec<f64> = (0..self.prompts.len())
                    .filter_map(|row| self.cell(row, col))
                    .filter_map(|r| r.average_score())
                    .collect();
                if scored.is_empty() {
                    None
                } else {
                    Some(scored.iter().sum::<f64>() / scored.len() as f64)
                }
            })
            .collect()
    }
}
