//! Language-study planner: parse the request, ask for whatever is missing,
//! then have the word-learning tool write the lesson.
//!
//! | prior results | state     | step                                                   |
//! |---------------|-----------|--------------------------------------------------------|
//! | 0             | `Parse`   | call `input_parse` with the input and the examples     |
//! | 1             | `Process` | clarifying question if a field is blank, else call     |
//! |               |           | `learn_new_words` with `lang`, `words`, `examples_number` |
//! | 2             | `Finish`  | finish with the second result, unchanged               |
//! | 3+            | -         | `PlannerStateOverflow`                                 |

use serde_json::{json, Value};

use super::{overflow, PlannerStep, ToolCall};
use crate::agent::{AgentKind, Example};
use crate::error::RouterError;
use crate::tools::builtin::{INPUT_PARSE_TOOL, LEARN_NEW_WORDS_TOOL};
use crate::types::ToolOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageStudyState {
    Parse,
    Process,
    Finish,
}

impl LanguageStudyState {
    pub fn from_step_count(steps: usize) -> Option<Self> {
        match steps {
            0 => Some(Self::Parse),
            1 => Some(Self::Process),
            2 => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Fields the parser must fill before the lesson can be written, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Lang,
    Words,
    ExamplesNumber,
}

impl RequiredField {
    pub const ALL: [RequiredField; 3] = [Self::Lang, Self::Words, Self::ExamplesNumber];

    pub fn key(self) -> &'static str {
        match self {
            Self::Lang => "lang",
            Self::Words => "words",
            Self::ExamplesNumber => "examples_number",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Self::Lang => "What language do you want to learn?",
            Self::Words => "What words do you want to learn?",
            Self::ExamplesNumber => "How many example of sentences to create?",
        }
    }
}

/// Whether a parsed value counts as absent: missing, null, blank string,
/// empty array or object, zero, or false.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
    }
}

#[derive(Debug, Clone)]
pub struct LanguageStudyPlanner {
    examples: Vec<Example>,
}

impl LanguageStudyPlanner {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// First required field that is blank in `parsed`, in check order.
    pub fn missing_field(parsed: &Value) -> Option<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .find(|field| is_blank(parsed.get(field.key())))
    }

    pub fn plan(&self, input: &str, prior: &[ToolOutput]) -> Result<PlannerStep, RouterError> {
        let state = LanguageStudyState::from_step_count(prior.len())
            .ok_or_else(|| overflow(AgentKind::LanguageStudy, prior.len()))?;
        Ok(match state {
            LanguageStudyState::Parse => PlannerStep::Action(ToolCall::new(
                INPUT_PARSE_TOOL,
                json!({
                    "prompt": input,
                    "few_shots": self.examples,
                }),
            )),
            LanguageStudyState::Process => {
                let parsed = &prior[0].primary;
                match Self::missing_field(parsed) {
                    Some(field) => PlannerStep::Finish(ToolOutput::text(field.question())),
                    None => PlannerStep::Action(ToolCall::new(
                        LEARN_NEW_WORDS_TOOL,
                        json!({
                            "lang": parsed["lang"],
                            "words": parsed["words"],
                            "examples_number": parsed["examples_number"],
                        }),
                    )),
                }
            }
            LanguageStudyState::Finish => PlannerStep::Finish(prior[1].clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentDescriptor;
    use pretty_assertions::assert_eq;

    fn planner() -> LanguageStudyPlanner {
        LanguageStudyPlanner::new(AgentDescriptor::language_study().examples)
    }

    fn parsed(value: Value) -> Vec<ToolOutput> {
        vec![ToolOutput::structured(value)]
    }

    #[test]
    fn transition_table() {
        assert_eq!(LanguageStudyState::from_step_count(0), Some(LanguageStudyState::Parse));
        assert_eq!(LanguageStudyState::from_step_count(1), Some(LanguageStudyState::Process));
        assert_eq!(LanguageStudyState::from_step_count(2), Some(LanguageStudyState::Finish));
        assert_eq!(LanguageStudyState::from_step_count(3), None);
    }

    #[test]
    fn parse_step_sends_input_and_examples() {
        let step = planner().plan("teach me 天", &[]).unwrap();
        let PlannerStep::Action(call) = step else {
            panic!("expected action");
        };
        assert_eq!(call.tool, "input_parse");
        assert_eq!(call.input["prompt"], "teach me 天");
        assert_eq!(call.input["few_shots"].as_array().unwrap().len(), 2);
        assert_eq!(call.input["few_shots"][1]["output"]["words"], "天, 地");
    }

    #[test]
    fn missing_language_is_asked_first() {
        let step = planner().plan("x", &parsed(json!({"lang": "", "words": ""}))).unwrap();
        assert_eq!(
            step,
            PlannerStep::Finish(ToolOutput::text("What language do you want to learn?"))
        );
    }

    #[test]
    fn missing_words_is_asked_when_language_present() {
        let step = planner()
            .plan("x", &parsed(json!({"lang": "Chinese", "words": "", "examples_number": 0})))
            .unwrap();
        assert_eq!(
            step,
            PlannerStep::Finish(ToolOutput::text("What words do you want to learn?"))
        );
    }

    #[test]
    fn missing_count_is_asked_last() {
        let step = planner()
            .plan("x", &parsed(json!({"lang": "Chinese", "words": "天", "examples_number": 0})))
            .unwrap();
        assert_eq!(
            step,
            PlannerStep::Finish(ToolOutput::text("How many example of sentences to create?"))
        );
    }

    #[test]
    fn clarifying_question_has_empty_summary_and_detail() {
        let step = planner().plan("x", &parsed(json!({}))).unwrap();
        let PlannerStep::Finish(output) = step else {
            panic!("expected finish");
        };
        assert!(output.summary.is_empty());
        assert!(output.detail.is_empty());
    }

    #[test]
    fn complete_fields_call_domain_tool_with_exactly_those_fields() {
        let step = planner()
            .plan(
                "x",
                &parsed(json!({
                    "lang": "Chinese",
                    "words": "天, 地",
                    "examples_number": 5,
                    "tone": "formal"
                })),
            )
            .unwrap();
        assert_eq!(
            step,
            PlannerStep::Action(ToolCall::new(
                "learn_new_words",
                json!({"lang": "Chinese", "words": "天, 地", "examples_number": 5})
            ))
        );
    }

    #[test]
    fn non_object_parse_result_asks_for_language() {
        let step = planner().plan("x", &parsed(json!("not an object"))).unwrap();
        assert_eq!(
            step,
            PlannerStep::Finish(ToolOutput::text(RequiredField::Lang.question()))
        );
    }

    #[test]
    fn finish_returns_second_result_unchanged() {
        let lesson = ToolOutput::text("天 (tiān): sky").with_detail("d");
        let prior = vec![
            ToolOutput::structured(json!({"lang": "Chinese"})),
            lesson.clone(),
        ];
        assert_eq!(planner().plan("x", &prior).unwrap(), PlannerStep::Finish(lesson));
    }

    #[test]
    fn extra_results_overflow() {
        let prior = vec![ToolOutput::text("a"), ToolOutput::text("b"), ToolOutput::text("c")];
        let err = planner().plan("x", &prior).unwrap_err();
        assert!(matches!(err, RouterError::PlannerStateOverflow { steps: 3, .. }));
    }

    #[test]
    fn blankness_follows_truthiness() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(null))));
        assert!(is_blank(Some(&json!("  "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(is_blank(Some(&json!(0))));
        assert!(is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!("天"))));
        assert!(!is_blank(Some(&json!(["天"]))));
        assert!(!is_blank(Some(&json!(2))));
    }
}
