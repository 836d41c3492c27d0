//! Few-shot agent router.
//!
//! Routes each chat turn to a task agent chosen by embedding similarity
//! between the conversation and the agents' few-shot examples. The bound
//! agent's planner then drives LLM-backed tools to a final answer.
//!
//! # Quick Start
//!
//! ```no_run
//! use fewshot_router::prelude::*;
//!
//! # async fn example() -> fewshot_router::error::Result<()> {
//! let config = RouterConfig::load(None)?;
//! let router = TurnRouter::from_config(&config)?;
//! let reply = router.process_turn(None, "hi").await?;
//! println!("{}", reply.response);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod planner;
pub mod prelude;
pub mod provider;
pub mod router;
pub mod selector;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
