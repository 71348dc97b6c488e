use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CompareError, ParseSelectionError, SelectionError};
use crate::index::IndexBuilder;
use crate::matcher;
use crate::models::{Correctness, EvaluationRecord, RecordShape, ScoreBand};
use crate::store::RecordStore;

/// The four user inputs of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub model_a: String,
    pub model_b: String,
    pub dataset: String,
    pub problem_id: i64,
}

impl Selection {
    pub fn new(
        model_a: impl Into<String>,
        model_b: impl Into<String>,
        dataset: impl Into<String>,
        problem_id: i64,
    ) -> Self {
        Self {
            model_a: model_a.into(),
            model_b: model_b.into(),
            dataset: dataset.into(),
            problem_id,
        }
    }

    /// Check the selection against the options of the loaded collection
    pub fn validate(&self, index: &IndexBuilder) -> Result<(), SelectionError> {
        if self.model_a == self.model_b {
            return Err(SelectionError::SameModel {
                model: self.model_a.clone(),
            });
        }
        for model in [&self.model_a, &self.model_b] {
            if !index.has_model(model) {
                return Err(SelectionError::UnknownModel(model.clone()));
            }
        }
        if !index.has_dataset(&self.dataset) {
            return Err(SelectionError::UnknownDataset(self.dataset.clone()));
        }
        if !index.has_problem_id(self.problem_id) {
            return Err(SelectionError::UnknownProblemId(self.problem_id));
        }
        Ok(())
    }
}

/// Parses `<model_a> <model_b> <dataset> <problem_id>`
impl FromStr for Selection {
    type Err = ParseSelectionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[model_a, model_b, dataset, problem_id] = fields.as_slice() else {
            return Err(ParseSelectionError::FieldCount(fields.len()));
        };
        let problem_id = problem_id
            .parse()
            .map_err(|_| ParseSelectionError::ProblemId(problem_id.to_string()))?;
        Ok(Self::new(model_a, model_b, dataset, problem_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// A side of the selection with no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSide {
    pub side: Side,
    pub model: String,
    pub dataset: String,
    pub problem_id: i64,
}

impl fmt::Display for MissingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no data for model {}, dataset {}, problem id {}",
            self.model, self.dataset, self.problem_id
        )
    }
}

/// Which sides of a selection had no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsenceReport {
    pub missing: Vec<MissingSide>,
}

/// One model's column in the general view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralSide<'a> {
    pub model: &'a str,
    pub predicted_answer: Option<&'a Value>,
    pub correctness: Correctness,
    pub model_response: Option<&'a Value>,
}

/// One model's column in the evaluator-scored view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSide<'a> {
    pub model: &'a str,
    pub score: f64,
    pub band: ScoreBand,
    pub model_response: Option<&'a Value>,
}

/// Resolved pair, shaped by the selected dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Comparison<'a> {
    General {
        dataset: &'a str,
        problem_id: i64,
        question: Option<&'a Value>,
        true_answer: Option<&'a Value>,
        a: GeneralSide<'a>,
        b: GeneralSide<'a>,
    },
    EvaluatorScored {
        dataset: &'a str,
        problem_id: i64,
        question: Option<&'a Value>,
        eval_aspect: Option<&'a Value>,
        a: ScoredSide<'a>,
        b: ScoredSide<'a>,
    },
}

impl<'a> Comparison<'a> {
    pub fn shape(&self) -> RecordShape {
        match self {
            Comparison::General { .. } => RecordShape::General,
            Comparison::EvaluatorScored { .. } => RecordShape::EvaluatorScored,
        }
    }

    fn build(shape: RecordShape, a: &'a EvaluationRecord, b: &'a EvaluationRecord) -> Self {
        // shared fields come from side A
        match shape {
            RecordShape::General => Comparison::General {
                dataset: &a.dataset,
                problem_id: a.problem_id,
                question: a.question.as_ref(),
                true_answer: a.true_answer.as_ref(),
                a: GeneralSide::from(a),
                b: GeneralSide::from(b),
            },
            RecordShape::EvaluatorScored => Comparison::EvaluatorScored {
                dataset: &a.dataset,
                problem_id: a.problem_id,
                question: a.question.as_ref(),
                eval_aspect: a.eval_aspect.as_ref(),
                a: ScoredSide::from(a),
                b: ScoredSide::from(b),
            },
        }
    }
}

impl<'a> From<&'a EvaluationRecord> for GeneralSide<'a> {
    fn from(record: &'a EvaluationRecord) -> Self {
        Self {
            model: &record.model_name,
            predicted_answer: record.predicted_answer.as_ref(),
            correctness: record.correctness(),
            model_response: record.model_response.as_ref(),
        }
    }
}

impl<'a> From<&'a EvaluationRecord> for ScoredSide<'a> {
    fn from(record: &'a EvaluationRecord) -> Self {
        let score = record.score();
        Self {
            model: &record.model_name,
            score,
            band: ScoreBand::from_score(score),
            model_response: record.model_response.as_ref(),
        }
    }
}

/// Run the full selection flow against a loaded collection
pub fn compare<'a>(
    store: &'a RecordStore,
    index: &IndexBuilder,
    selection: &Selection,
    evaluator_scored: &[String],
) -> Result<Comparison<'a>, CompareError> {
    selection.validate(index)?;

    let pair = matcher::match_pair(
        store,
        &selection.model_a,
        &selection.model_b,
        &selection.dataset,
        selection.problem_id,
    );

    match (pair.a.record(), pair.b.record()) {
        (Some(a), Some(b)) => {
            let shape = RecordShape::for_dataset(&selection.dataset, evaluator_scored);
            debug!(?shape, "resolved both records");
            Ok(Comparison::build(shape, a, b))
        }
        _ => {
            let sides = [
                (Side::A, pair.a, &selection.model_a),
                (Side::B, pair.b, &selection.model_b),
            ];
            let missing: Vec<MissingSide> = sides
                .into_iter()
                .filter(|(_, found, _)| !found.is_found())
                .map(|(side, _, model)| MissingSide {
                    side,
                    model: model.clone(),
                    dataset: selection.dataset.clone(),
                    problem_id: selection.problem_id,
                })
                .collect();
            info!(missing = missing.len(), "selection has no matching data");
            Err(CompareError::NoMatch(AbsenceReport { missing }))
        }
    }
}
