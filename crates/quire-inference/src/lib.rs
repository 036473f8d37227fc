//! # quire-inference
//!
//! AI writing assist for quire.
//!
//! This crate provides:
//! - An OpenAI-compatible generation backend (works with Gemini's
//!   OpenAI endpoint, OpenAI, Ollama, vLLM, and similar servers)
//! - Assist actions with prompt templates and failure fallbacks
//! - A coordinator that bounds calls with a timeout and discards results
//!   superseded by a newer call for the same session
//! - Cleanup of model output (reasoning tags, wrapping code fences)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use quire_inference::{AssistAction, AssistCoordinator, AssistRequest, OpenAICompatBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAICompatBackend::from_env().unwrap();
//!     let assist = AssistCoordinator::new(Arc::new(backend), Duration::from_secs(30));
//!     let outcome = assist
//!         .run(&AssistRequest::new(AssistAction::Summarize, "Long note..."))
//!         .await
//!         .unwrap();
//!     println!("{}", outcome.text);
//! }
//! ```

pub mod assist;
pub mod cleanup;
pub mod openai;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use quire_core::{Error, GenerationBackend, Result};

pub use assist::{AssistAction, AssistCoordinator, AssistOutcome, AssistRequest};
pub use cleanup::clean_response;
pub use openai::{OpenAICompatBackend, OpenAICompatConfig};
