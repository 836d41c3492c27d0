//! Core types shared by the router, planners, and tools.

pub mod generation;
pub mod message;
pub mod output;

pub use generation::*;
pub use message::*;
pub use output::*;
