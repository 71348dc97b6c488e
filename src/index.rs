use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::store::RecordStore;

const BASE_MODEL: &str = "base_model";
const CHECKPOINT_PREFIX: &str = "checkpoint_";

/// Training step of a checkpoint, compared as an integer of any size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    negative: bool,
    // no leading zeros; empty for zero
    digits: &'a str,
}

impl<'a> Step<'a> {
    /// Read an optionally signed decimal integer, ignoring surrounding whitespace
    pub fn parse(segment: &'a str) -> Option<Self> {
        let segment = segment.trim();
        let (negative, unsigned) = match segment.as_bytes().first()? {
            b'-' => (true, &segment[1..]),
            b'+' => (false, &segment[1..]),
            _ => (false, segment),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = unsigned.trim_start_matches('0');
        Some(Self {
            negative: negative && !digits.is_empty(),
            digits,
        })
    }
}

impl Ord for Step<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let magnitude = self
            .digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(other.digits));
        match (self.negative, other.negative) {
            (false, false) => magnitude,
            (true, true) => magnitude.reverse(),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Step<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key for model names: the base model, then checkpoints by step, then
/// everything else by name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModelSortKey<'a> {
    Base,
    // name breaks ties between e.g. `checkpoint_200` and `checkpoint_0200`
    Checkpoint(Step<'a>, &'a str),
    Other(&'a str),
}

impl<'a> ModelSortKey<'a> {
    pub fn of(name: &'a str) -> Self {
        if name == BASE_MODEL {
            return ModelSortKey::Base;
        }
        if name.starts_with(CHECKPOINT_PREFIX) {
            // step is the segment between the first and second underscore
            let step = name.split('_').nth(1).and_then(Step::parse);
            if let Some(step) = step {
                return ModelSortKey::Checkpoint(step, name);
            }
        }
        ModelSortKey::Other(name)
    }
}

/// Sort distinct model names into display order
pub fn sort_model_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let distinct: BTreeSet<String> = names.into_iter().map(Into::into).collect();
    let mut models: Vec<String> = distinct.into_iter().collect();
    models.sort_by(|a, b| ModelSortKey::of(a).cmp(&ModelSortKey::of(b)));
    models
}

/// Lazily computes and caches the model, dataset and problem-id option lists
/// for one record collection
#[derive(Debug)]
pub struct IndexBuilder {
    store: Arc<RecordStore>,
    models: OnceLock<Vec<String>>,
    datasets: OnceLock<Vec<String>>,
    problem_ids: OnceLock<Vec<i64>>,
}

impl IndexBuilder {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            models: OnceLock::new(),
            datasets: OnceLock::new(),
            problem_ids: OnceLock::new(),
        }
    }

    pub fn model_names(&self) -> &[String] {
        self.models.get_or_init(|| {
            let models = sort_model_names(self.store.iter().map(|r| r.model_name.as_str()));
            debug!(count = models.len(), "indexed model names");
            models
        })
    }

    pub fn datasets(&self) -> &[String] {
        self.datasets.get_or_init(|| {
            let datasets: BTreeSet<&str> = self.store.iter().map(|r| r.dataset.as_str()).collect();
            debug!(count = datasets.len(), "indexed datasets");
            datasets.into_iter().map(str::to_string).collect()
        })
    }

    pub fn problem_ids(&self) -> &[i64] {
        self.problem_ids.get_or_init(|| {
            let ids: BTreeSet<i64> = self.store.iter().map(|r| r.problem_id).collect();
            debug!(count = ids.len(), "indexed problem ids");
            ids.into_iter().collect()
        })
    }

    pub fn has_model(&self, model: &str) -> bool {
        self.model_names().iter().any(|m| m == model)
    }

    pub fn has_dataset(&self, dataset: &str) -> bool {
        self.datasets().binary_search_by(|d| d.as_str().cmp(dataset)).is_ok()
    }

    pub fn has_problem_id(&self, problem_id: i64) -> bool {
        self.problem_ids().binary_search(&problem_id).is_ok()
    }
}
