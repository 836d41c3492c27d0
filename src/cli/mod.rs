//! Command-line interface for the few-shot router.

pub mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{EmbeddingBackend, RouterConfig};

/// Few-shot agent router CLI
#[derive(Parser, Debug)]
#[command(name = "fewshot", version, about = "Chat with few-shot routed agents")]
pub struct Cli {
    /// Config file (default: ~/.fewshot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat model used by every tool
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Minimum similarity for a task agent to be selected
    #[arg(long, global = true)]
    pub threshold: Option<f32>,

    /// Embedding backend (lexical, openai)
    #[arg(long, global = true)]
    pub embedding: Option<EmbeddingBackend>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat over stdin
    Chat(ChatArgs),
    /// Send a single message and print the reply
    Ask(AskArgs),
    /// List registered agents and their examples
    Agents,
    /// List built-in tools
    Tools,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Resume an existing session id
    #[arg(short, long)]
    pub session: Option<String>,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The user message
    pub message: String,

    /// Session id to continue
    #[arg(short, long)]
    pub session: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut RouterConfig) {
        if let Some(model) = &self.model {
            config.chat_model = model.clone();
        }
        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(backend) = self.embedding {
            config.embedding_backend = Some(backend);
        }
    }

    /// Default log filter directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "fewshot_router=debug,info",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chat_with_defaults() {
        let cli = Cli::try_parse_from(["fewshot", "chat"]).unwrap();
        match cli.command {
            Commands::Chat(args) => assert!(args.session.is_none()),
            other => panic!("expected Chat, got {other:?}"),
        }
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_directive(), "warn");
    }

    #[test]
    fn parse_ask_with_session() {
        let cli = Cli::try_parse_from(["fewshot", "ask", "hi", "--session", "abc"]).unwrap();
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.message, "hi");
                assert_eq!(args.session.as_deref(), Some("abc"));
            }
            other => panic!("expected Ask, got {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "fewshot",
            "agents",
            "--threshold",
            "0.3",
            "--embedding",
            "OpenAI",
            "-m",
            "gpt-4o-mini",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Agents));
        assert_eq!(cli.embedding, Some(EmbeddingBackend::OpenAi));
        assert_eq!(cli.verbose, 2);

        let mut config = RouterConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert!((config.similarity_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.embedding_backend, Some(EmbeddingBackend::OpenAi));
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["fewshot"]).is_err());
    }

    #[test]
    fn parse_ask_missing_message_is_error() {
        assert!(Cli::try_parse_from(["fewshot", "ask"]).is_err());
    }
}
