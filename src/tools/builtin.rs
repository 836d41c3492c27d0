//! Built-in tools, each a single prompt to the chat model.
//!
//! - `openai`: answers anything, given the raw user input.
//! - `input_parse`: turns the user input into a JSON object, guided by an
//!   agent's few-shot examples.
//! - `learn_new_words`: explains words and writes example sentences in a
//!   target language.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;

use crate::agent::Example;
use crate::error::RouterError;
use crate::generation::generate_text;
use crate::provider::ModelProvider;
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::AgentToolParameters;
use crate::types::{GenerationSettings, ModelMessage, ResponseFormat, ToolOutput};

pub const OPENAI_TOOL: &str = "openai";
pub const INPUT_PARSE_TOOL: &str = "input_parse";
pub const LEARN_NEW_WORDS_TOOL: &str = "learn_new_words";

const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful assistant to answer all kinds of questions.";
const LESSON_SYSTEM_PROMPT: &str =
    "You are a helpful language teacher who helps the user learn new words.";

/// All built-in tools, in registration order.
pub fn all_tools(
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
) -> Vec<Arc<dyn Tool>> {
    vec![
        learn_new_words_tool(provider.clone(), settings.clone()),
        openai_tool(provider.clone(), settings.clone()),
        input_parse_tool(provider, settings),
    ]
}

/// Create the `openai` tool for general-purpose chat.
///
/// Input is the raw user text, or an object with a `prompt` field.
pub fn openai_tool(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        OPENAI_TOOL,
        "Chat with the general-purpose language model",
        AgentToolParameters::object()
            .string("prompt", "What the user said", true)
            .build(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let provider = provider.clone();
            let settings = settings.clone();
            async move {
                let prompt = args.text("prompt")?;
                let messages = vec![
                    ModelMessage::system(GENERAL_SYSTEM_PROMPT),
                    ModelMessage::user(prompt),
                ];
                let text = generate_text(provider.as_ref(), messages, settings).await?;
                Ok(ToolOutput::text(text))
            }
        },
    ))
}

/// Create the `input_parse` tool for few-shot JSON extraction.
///
/// Requests JSON-object output from the model. The reply may still be
/// wrapped in a Markdown code fence or surrounded by prose; the first JSON
/// object found is returned. Anything else is a `ToolInvalidResponse`.
pub fn input_parse_tool(
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        INPUT_PARSE_TOOL,
        "Parse user input into the key fields a specific tool needs",
        AgentToolParameters::object()
            .string("prompt", "What the user said", true)
            .array(
                "few_shots",
                "Example inputs with the JSON each should produce",
                serde_json::json!({"type": "object"}),
                false,
            )
            .build(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let provider = provider.clone();
            let settings = GenerationSettings {
                response_format: Some(ResponseFormat::JsonObject),
                ..settings.clone()
            };
            async move {
                let prompt = args.get_str("prompt")?.to_string();
                let few_shots: Vec<Example> = args.field_or_default("few_shots")?;
                let messages = parse_messages(&prompt, &few_shots);
                let reply = generate_text(provider.as_ref(), messages, settings).await?;
                let parsed = extract_json_object(&reply)
                    .map_err(|message| RouterError::invalid_response(INPUT_PARSE_TOOL, message))?;
                Ok(ToolOutput::structured(parsed))
            }
        },
    ))
}

/// Create the `learn_new_words` tool for word meanings plus example sentences.
pub fn learn_new_words_tool(
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        LEARN_NEW_WORDS_TOOL,
        "Explain new words and write example sentences using them",
        AgentToolParameters::object()
            .string("lang", "Language to study", true)
            .string("words", "Words to learn, comma separated", true)
            .integer("examples_number", "How many sentences to write", false)
            .build(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let provider = provider.clone();
            let settings = settings.clone();
            async move {
                let lesson = LessonRequest::from_arguments(&args)?;
                let messages = vec![
                    ModelMessage::system(LESSON_SYSTEM_PROMPT),
                    ModelMessage::user(lesson.prompt()),
                ];
                let text = generate_text(provider.as_ref(), messages, settings).await?;
                Ok(ToolOutput::text(text))
            }
        },
    ))
}

/// Render few-shot examples for the parser's system prompt.
pub fn format_few_shots(examples: &[Example]) -> String {
    examples
        .iter()
        .map(|ex| format!("\ninput:\"{}\", output is:\"{}\"\n", ex.input, ex.output))
        .collect()
}

fn parse_messages(prompt: &str, examples: &[Example]) -> Vec<ModelMessage> {
    vec![
        ModelMessage::system(format!(
            "You are a helpful JSON formatter. Here are some examples of how to format the JSON output:{} \
             Only output the JSON formatted response. If you cannot extract a value from the user input, \
             use \"\" as the value instead.",
            format_few_shots(examples)
        )),
        ModelMessage::user(format!("input: \"{prompt}\", output is:")),
    ]
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence pattern must compile")
    })
}

/// Pull a JSON object out of a model reply.
pub fn extract_json_object(reply: &str) -> Result<Value, String> {
    let body = code_fence()
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply)
        .trim();

    let candidate = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(_) => {
            let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
                return Err(format!("expected a JSON object, got: {body}"));
            };
            if end < start {
                return Err(format!("expected a JSON object, got: {body}"));
            }
            serde_json::from_str::<Value>(&body[start..=end])
                .map_err(|e| format!("expected a JSON object ({e}), got: {body}"))?
        }
    };

    if candidate.is_object() {
        Ok(candidate)
    } else {
        Err(format!("expected a JSON object, got: {candidate}"))
    }
}

/// Validated input of `learn_new_words`.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonRequest {
    pub lang: String,
    pub words: Vec<String>,
    pub examples_number: u32,
}

impl LessonRequest {
    /// Accepts `words` as a comma-separated string or an array, and
    /// `examples_number` as a whole number (`5` or `5.0`) or numeric string
    /// (default 1).
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, RouterError> {
        let lang = args
            .get("lang")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        let words = match args.get("words") {
            Some(Value::String(text)) => split_words(text),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str())
                .flat_map(split_words)
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(RouterError::InvalidArgument(format!(
                    "words must be a string or a list, got {other}"
                )))
            }
        };

        let examples_number = match args.get("examples_number") {
            None | Some(Value::Null) => 1,
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                        .map(|f| f as u64)
                })
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    RouterError::InvalidArgument(format!("examples_number must be a positive integer, got {n}"))
                })?,
            Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| {
                RouterError::InvalidArgument(format!("examples_number must be a positive integer, got '{s}'"))
            })?,
            Some(other) => {
                return Err(RouterError::InvalidArgument(format!(
                    "examples_number must be a positive integer, got {other}"
                )))
            }
        };

        Ok(Self {
            lang,
            words,
            examples_number,
        })
    }

    pub fn prompt(&self) -> String {
        format!(
            "Please show me the meaning of the following words in English: {words}. \
             Give each word its {lang} phonetic transcription. \
             Then create {n} sentences in {lang}, each using all of these words.",
            words = self.words.join(" "),
            lang = self.lang,
            n = self.examples_number,
        )
    }
}

fn split_words(text: &str) -> Vec<String> {
    text.split([',', '，', '、'])
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
