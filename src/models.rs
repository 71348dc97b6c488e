use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::correctness;

/// One evaluation outcome for a (model, dataset, problem) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Model identifier, e.g. `base_model` or `checkpoint_200`
    pub model_name: String,
    /// Dataset identifier
    pub dataset: String,
    /// Problem identifier, unique per dataset only
    pub problem_id: i64,
    /// Problem statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Value>,
    /// Reference answer (general datasets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_answer: Option<Value>,
    /// Answer extracted from the model output (general datasets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_answer: Option<Value>,
    /// Full generated output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_response: Option<Value>,
    /// Stored verdict; derived on read when absent, never written back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// What the external evaluator judged (evaluator-scored datasets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_aspect: Option<Value>,
    /// External evaluator score in [0, 5] (evaluator-scored datasets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt4_score: Option<f64>,
}

impl EvaluationRecord {
    /// Natural key of the record
    pub fn key(&self) -> (&str, &str, i64) {
        (&self.model_name, &self.dataset, self.problem_id)
    }

    /// Verdict for this record, trusting a stored value over a derived one
    pub fn correctness(&self) -> Correctness {
        match self.is_correct {
            Some(value) => Correctness::Stored(value),
            None => Correctness::Derived(correctness::evaluate(
                self.predicted_answer.as_ref(),
                self.true_answer.as_ref(),
            )),
        }
    }

    /// Evaluator score, absent treated as 0
    pub fn score(&self) -> f64 {
        self.gpt4_score.unwrap_or(0.0)
    }
}

/// Whether a verdict came from the data or was computed from the answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    Stored(bool),
    Derived(bool),
}

impl Correctness {
    pub fn is_correct(self) -> bool {
        match self {
            Correctness::Stored(value) | Correctness::Derived(value) => value,
        }
    }

    pub fn is_derived(self) -> bool {
        matches!(self, Correctness::Derived(_))
    }
}

/// Which fields of a record are meaningful for a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordShape {
    /// Exact-match datasets with predicted/true answers
    General,
    /// Datasets graded by an external evaluator on a 0-5 scale
    EvaluatorScored,
}

impl RecordShape {
    pub fn for_dataset(dataset: &str, evaluator_scored: &[String]) -> Self {
        if evaluator_scored.iter().any(|name| name == dataset) {
            RecordShape::EvaluatorScored
        } else {
            RecordShape::General
        }
    }
}

/// Coarse grade of an evaluator score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Failing,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            ScoreBand::Excellent
        } else if score >= 3.5 {
            ScoreBand::Good
        } else if score >= 2.5 {
            ScoreBand::Fair
        } else if score >= 1.5 {
            ScoreBand::Poor
        } else {
            ScoreBand::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
            ScoreBand::Failing => "failing",
        }
    }
}

/// Top-level results document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// Missing key behaves as an empty collection
    #[serde(default)]
    pub detailed_results: Vec<EvaluationRecord>,
}
