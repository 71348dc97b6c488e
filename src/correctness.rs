use serde_json::Value;
use tracing::debug;

/// Decide whether `predicted` matches `truth` for records without a stored
/// `is_correct`.
///
/// Numeric answers compare as numbers so `"42"` and `42.0` agree. Everything
/// else compares as text with surrounding whitespace removed; case and
/// punctuation still matter.
pub fn evaluate(predicted: Option<&Value>, truth: Option<&Value>) -> bool {
    let verdict = match (as_number(predicted), as_number(truth)) {
        (Some(left), Some(right)) => left == right,
        _ => as_text(predicted).trim() == as_text(truth).trim(),
    };
    debug!(?predicted, ?truth, verdict, "derived correctness");
    verdict
}

/// Numeric reading of an answer, if it has one
fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Text form of an answer; absent and null answers read as `None`
fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
    }
}
