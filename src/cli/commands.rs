//! Handlers behind each CLI subcommand.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::agent::AgentRegistry;
use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::provider::openai::OpenAiProvider;
use crate::router::TurnRouter;
use crate::tools::ToolRegistry;
use crate::types::{GenerationSettings, TurnResponse};

use super::{AskArgs, ChatArgs};

/// Interactive loop: one turn per stdin line until EOF or `/exit`.
pub async fn handle_chat(config: &RouterConfig, args: ChatArgs) -> Result<(), RouterError> {
    let router = TurnRouter::from_config(config)?;
    let session_id = args.session.unwrap_or_else(|| Uuid::new_v4().to_string());
    eprintln!("session: {session_id} (Ctrl-D or /exit to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/exit" {
            break;
        }

        match router.process_turn(Some(&session_id), message).await {
            Ok(response) => print_response(&response),
            Err(err) => eprintln!("{}", err.user_message()),
        }
    }
    Ok(())
}

/// Single turn; the session id goes to stderr so stdout holds only the reply.
pub async fn handle_ask(config: &RouterConfig, args: AskArgs) -> Result<(), RouterError> {
    let router = TurnRouter::from_config(config)?;
    let response = router
        .process_turn(args.session.as_deref(), &args.message)
        .await?;
    eprintln!("session: {}", response.session_id);
    print_response(&response);
    Ok(())
}

pub fn handle_agents() -> Result<(), RouterError> {
    let registry = AgentRegistry::builtin();
    for agent in registry.agents() {
        println!("{} - {}", agent.kind, agent.description);
        for example in &agent.examples {
            println!("    e.g. {}", example.input);
        }
    }
    let fallback = registry.fallback();
    println!("{} (fallback) - {}", fallback.kind, fallback.description);
    Ok(())
}

/// Lists tool definitions. Nothing is sent to the model, so no API key is needed.
pub fn handle_tools(config: &RouterConfig) -> Result<(), RouterError> {
    let provider = Arc::new(OpenAiProvider::new(
        config.chat_model.clone(),
        config.api_key.clone().unwrap_or_default(),
        config.base_url.clone(),
    ));
    let tools = ToolRegistry::builtin(provider, GenerationSettings::default());
    for definition in tools.definitions() {
        println!("{} - {}", definition.name, definition.description);
        println!("{}", serde_json::to_string_pretty(&definition.parameters)?);
    }
    Ok(())
}

fn print_response(response: &TurnResponse) {
    println!("{}", response.response);
    if !response.summary.is_empty() {
        println!("summary: {}", response.summary);
    }
    if !response.detail.is_empty() {
        println!("detail: {}", response.detail);
    }
}
