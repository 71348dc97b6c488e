use tracing::debug;

use crate::models::EvaluationRecord;
use crate::store::RecordStore;

/// Lookup result for one side of a comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideMatch<'a> {
    Found(&'a EvaluationRecord),
    NotFound,
}

impl<'a> SideMatch<'a> {
    pub fn record(self) -> Option<&'a EvaluationRecord> {
        match self {
            SideMatch::Found(record) => Some(record),
            SideMatch::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, SideMatch::Found(_))
    }
}

/// Records resolved for both requested models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair<'a> {
    pub a: SideMatch<'a>,
    pub b: SideMatch<'a>,
}

/// Find the records of `model_a` and `model_b` for one dataset problem.
///
/// Single pass; the first record per side wins and later duplicates are
/// ignored. A record binds to at most one side. Callers reject
/// `model_a == model_b` before getting here.
pub fn match_pair<'a>(
    store: &'a RecordStore,
    model_a: &str,
    model_b: &str,
    dataset: &str,
    problem_id: i64,
) -> MatchedPair<'a> {
    let mut a = SideMatch::NotFound;
    let mut b = SideMatch::NotFound;

    for record in store.iter() {
        if record.dataset != dataset || record.problem_id != problem_id {
            continue;
        }
        if record.model_name == model_a {
            if a.is_found() {
                debug!(key = ?record.key(), "ignoring duplicate record");
            } else {
                a = SideMatch::Found(record);
            }
        } else if record.model_name == model_b {
            if b.is_found() {
                debug!(key = ?record.key(), "ignoring duplicate record");
            } else {
                b = SideMatch::Found(record);
            }
        }
    }

    MatchedPair { a, b }
}
