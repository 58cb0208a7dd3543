//! # agent-core
//!
//! Provider-agnostic LLM abstraction and an extensible tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Caller                           │
//! │  ┌──────────────────┐      ┌──────────────────────┐  │
//! │  │   ToolRegistry   │      │     LlmProvider      │  │
//! │  │  (named tools)   │      │     (Strategy)       │  │
//! │  └──────────────────┘      └──────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait allows swapping Ollama for any other backend
//! without changing the caller.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider, ModelInfo};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
