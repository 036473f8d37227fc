//! OpenAI-compatible generation backend.
//!
//! Speaks the `/chat/completions` protocol, so it works with any endpoint
//! that implements it, including:
//!
//! - Google Gemini (OpenAI compatibility endpoint, the default)
//! - OpenAI cloud API
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM, LocalAI, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_inference::openai::{OpenAICompatBackend, OpenAICompatConfig};
//! use quire_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAICompatConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: None,
//!         model: "llama3".to_string(),
//!         timeout_seconds: 30,
//!     };
//!     let backend = OpenAICompatBackend::new(config).unwrap();
//!     let text = backend.generate("Say hello").await.unwrap();
//! }
//! ```

mod backend;
mod types;

pub use backend::{
    OpenAICompatBackend, OpenAICompatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use types::*;
