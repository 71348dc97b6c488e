use crate::comparison::{Comparison, GeneralSide, ScoredSide};
use crate::error::CompareError;
use crate::index::IndexBuilder;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{self, Write};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// Text rendering settings shared by every view
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    pub format: OutputFormat,
    /// Shown for absent optional fields
    pub placeholder: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(format: OutputFormat, placeholder: &'a str) -> Self {
        Self { format, placeholder }
    }

    /// Write the ordered selection options
    pub fn write_options(&self, out: &mut impl Write, index: &IndexBuilder) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => {
                writeln!(out, "🤖 MODELS")?;
                for model in index.model_names() {
                    writeln!(out, "  {}", model)?;
                }
                writeln!(out)?;
                writeln!(out, "📚 DATASETS")?;
                for dataset in index.datasets() {
                    writeln!(out, "  {}", dataset)?;
                }
                writeln!(out)?;
                writeln!(out, "🔢 PROBLEM IDS")?;
                let ids: Vec<String> = index.problem_ids().iter().map(i64::to_string).collect();
                if ids.is_empty() {
                    writeln!(out, "  (none)")
                } else {
                    writeln!(out, "  {}", ids.join(", "))
                }
            }
            OutputFormat::Json => write_json(
                out,
                &json!({
                    "models": index.model_names(),
                    "datasets": index.datasets(),
                    "problem_ids": index.problem_ids(),
                }),
            ),
        }
    }

    /// Write a resolved comparison
    pub fn write_comparison(
        &self,
        out: &mut impl Write,
        comparison: &Comparison<'_>,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => self.write_comparison_plain(out, comparison),
            OutputFormat::Json => write_json(out, comparison),
        }
    }

    /// Write why a selection produced no comparison
    pub fn write_error(&self, out: &mut impl Write, error: &CompareError) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => {
                writeln!(out, "❌ {}", error)?;
                if let CompareError::NoMatch(report) = error {
                    for missing in &report.missing {
                        writeln!(out, "  ⚠️  {}", missing)?;
                    }
                }
                Ok(())
            }
            OutputFormat::Json => {
                let missing = match error {
                    CompareError::NoMatch(report) => json!(report.missing),
                    CompareError::Selection(_) => json!([]),
                };
                write_json(out, &json!({"error": error.to_string(), "missing": missing}))
            }
        }
    }

    fn write_comparison_plain(
        &self,
        out: &mut impl Write,
        comparison: &Comparison<'_>,
    ) -> io::Result<()> {
        match comparison {
            Comparison::General {
                dataset,
                problem_id,
                question,
                true_answer,
                a,
                b,
            } => {
                writeln!(out, "=== ⚔️  {} / problem {} ===", dataset, problem_id)?;
                writeln!(out)?;
                writeln!(out, "Question:")?;
                writeln!(out, "{}", self.value(*question))?;
                writeln!(out)?;
                writeln!(out, "True Answer:")?;
                writeln!(out, "{}", self.value(*true_answer))?;
                for side in [a, b] {
                    writeln!(out)?;
                    self.write_general_side(out, side)?;
                }
                Ok(())
            }
            Comparison::EvaluatorScored {
                dataset,
                problem_id,
                question,
                eval_aspect,
                a,
                b,
            } => {
                writeln!(out, "=== ⚔️  {} / problem {} (evaluator scored) ===", dataset, problem_id)?;
                writeln!(out)?;
                writeln!(out, "Question:")?;
                writeln!(out, "{}", self.value(*question))?;
                writeln!(out)?;
                writeln!(out, "Evaluation Aspect:")?;
                writeln!(out, "{}", self.value(*eval_aspect))?;
                for side in [a, b] {
                    writeln!(out)?;
                    self.write_scored_side(out, side)?;
                }
                Ok(())
            }
        }
    }

    fn write_general_side(&self, out: &mut impl Write, side: &GeneralSide<'_>) -> io::Result<()> {
        writeln!(out, "--- {} ---", side.model)?;
        writeln!(out, "Predicted Answer: {}", self.value(side.predicted_answer))?;
        let verdict = if side.correctness.is_correct() {
            "✅ Correct"
        } else {
            "❌ Incorrect"
        };
        if side.correctness.is_derived() {
            writeln!(out, "{} (derived)", verdict)?;
        } else {
            writeln!(out, "{}", verdict)?;
        }
        writeln!(out, "Model Response:")?;
        writeln!(out, "{}", self.value(side.model_response))
    }

    fn write_scored_side(&self, out: &mut impl Write, side: &ScoredSide<'_>) -> io::Result<()> {
        writeln!(out, "--- {} ---", side.model)?;
        writeln!(out, "GPT4 Score: {}/5 ({})", side.score, side.band.label())?;
        writeln!(out, "Model Response:")?;
        writeln!(out, "{}", self.value(side.model_response))
    }

    fn value(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => self.placeholder.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{AbsenceReport, MissingSide, Side};
    use crate::error::SelectionError;
    use crate::models::{Correctness, ScoreBand};
    use crate::store::RecordStore;
    use std::sync::Arc;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    /// `values` holds the question, the answer and side A's response
    fn general(values: &[Value; 3]) -> Comparison<'_> {
        let [question, answer, response] = values;
        Comparison::General {
            dataset: "gsm8k",
            problem_id: 3,
            question: Some(question),
            true_answer: Some(answer),
            a: GeneralSide {
                model: "base_model",
                predicted_answer: Some(answer),
                correctness: Correctness::Derived(true),
                model_response: Some(response),
            },
            b: GeneralSide {
                model: "checkpoint_200",
                predicted_answer: None,
                correctness: Correctness::Stored(false),
                model_response: None,
            },
        }
    }

    #[test]
    fn test_output_format_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            output: OutputFormat,
        }
        let wrapper: Wrapper = toml::from_str(r#"output = "json""#).unwrap();
        assert_eq!(wrapper.output, OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_plain_general_view() {
        let values = [json!("6 * 7?"), json!(42), json!("It is 42")];
        let comparison = general(&values);
        let renderer = Renderer::new(OutputFormat::Plain, "N/A");

        let text = render(|out| renderer.write_comparison(out, &comparison));
        assert!(text.contains("gsm8k / problem 3"));
        assert!(text.contains("6 * 7?"));
        assert!(text.contains("--- base_model ---"));
        assert!(text.contains("Predicted Answer: 42"));
        assert!(text.contains("✅ Correct (derived)"));
        assert!(text.contains("--- checkpoint_200 ---"));
        assert!(text.contains("Predicted Answer: N/A"));
        assert!(text.contains("❌ Incorrect\n"));
    }

    #[test]
    fn test_plain_renders_non_string_question() {
        let values = [json!(1234), json!(42), json!({"steps": 3})];
        let comparison = general(&values);
        let renderer = Renderer::new(OutputFormat::Plain, "N/A");

        let text = render(|out| renderer.write_comparison(out, &comparison));
        assert!(text.contains("Question:\n1234\n"));
        assert!(text.contains(r#"{"steps":3}"#));
    }

    #[test]
    fn test_plain_scored_view() {
        let aspect = json!("creativity");
        let responses = [json!("a"), json!("b")];
        let comparison = Comparison::EvaluatorScored {
            dataset: "elyza",
            problem_id: 0,
            question: None,
            eval_aspect: Some(&aspect),
            a: ScoredSide {
                model: "base_model",
                score: 4.0,
                band: ScoreBand::Good,
                model_response: Some(&responses[0]),
            },
            b: ScoredSide {
                model: "checkpoint_200",
                score: 1.0,
                band: ScoreBand::Failing,
                model_response: Some(&responses[1]),
            },
        };
        let renderer = Renderer::new(OutputFormat::Plain, "-");

        let text = render(|out| renderer.write_comparison(out, &comparison));
        assert!(text.contains("(evaluator scored)"));
        assert!(text.contains("Question:\n-\n"));
        assert!(text.contains("creativity"));
        assert!(text.contains("GPT4 Score: 4/5 (good)"));
        assert!(text.contains("GPT4 Score: 1/5 (failing)"));
    }

    #[test]
    fn test_json_comparison() {
        let values = [json!(6), json!("42"), json!("It is 42")];
        let comparison = general(&values);
        let renderer = Renderer::new(OutputFormat::Json, "N/A");

        let text = render(|out| renderer.write_comparison(out, &comparison));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["view"], "general");
        assert_eq!(value["a"]["model"], "base_model");
        assert_eq!(value["b"]["predicted_answer"], Value::Null);
    }

    #[test]
    fn test_plain_absence_report() {
        let error = CompareError::NoMatch(AbsenceReport {
            missing: vec![MissingSide {
                side: Side::B,
                model: "checkpoint_200".to_string(),
                dataset: "gsm8k".to_string(),
                problem_id: 7,
            }],
        });
        let renderer = Renderer::new(OutputFormat::Plain, "N/A");

        let text = render(|out| renderer.write_error(out, &error));
        assert!(text.contains("no matching data"));
        assert!(text.contains("no data for model checkpoint_200, dataset gsm8k, problem id 7"));
    }

    #[test]
    fn test_json_selection_error() {
        let error = CompareError::Selection(SelectionError::SameModel {
            model: "base_model".to_string(),
        });
        let renderer = Renderer::new(OutputFormat::Json, "N/A");

        let text = render(|out| renderer.write_error(out, &error));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value["error"].as_str().unwrap().contains("same model"));
        assert_eq!(value["missing"], json!([]));
    }

    #[test]
    fn test_options_plain_and_json() {
        let store = RecordStore::from_json(
            &json!({"detailed_results": [
                {"model_name": "checkpoint_1000", "dataset": "gsm8k", "problem_id": 2},
                {"model_name": "checkpoint_200", "dataset": "elyza", "problem_id": 1},
                {"model_name": "base_model", "dataset": "gsm8k", "problem_id": 1}
            ]})
            .to_string(),
        )
        .unwrap();
        let index = IndexBuilder::new(Arc::new(store));

        let text = render(|out| Renderer::new(OutputFormat::Plain, "N/A").write_options(out, &index));
        let base = text.find("base_model").unwrap();
        let early = text.find("checkpoint_200").unwrap();
        let late = text.find("checkpoint_1000").unwrap();
        assert!(base < early && early < late);
        assert!(text.contains("  1, 2"));

        let text = render(|out| Renderer::new(OutputFormat::Json, "N/A").write_options(out, &index));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["models"], json!(["base_model", "checkpoint_200", "checkpoint_1000"]));
        assert_eq!(value["datasets"], json!(["elyza", "gsm8k"]));
        assert_eq!(value["problem_ids"], json!([1, 2]));
    }

    #[test]
    fn test_options_empty_store() {
        let index = IndexBuilder::new(Arc::new(RecordStore::default()));
        let text = render(|out| Renderer::new(OutputFormat::Plain, "N/A").write_options(out, &index));
        assert!(text.contains("(none)"));
    }
}
