//! # agent-runtime
//!
//! Runtime LLM providers.
//!
//! ## Providers
//!
//! - **Ollama** (default): local LLM inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{OllamaConfig, OllamaProvider};
//!
//! let provider = OllamaProvider::from_config(OllamaConfig::from_env());
//! let completion = provider.complete(&messages, &provider.default_options()).await?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, GenerationOptions, LlmProvider, Message, Result, Role};
