//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_inference::mock::MockGenerationBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new().with_fixed_response("Test response");
//!     let text = backend.generate("anything").await.unwrap();
//!     assert_eq!(text, "Test response");
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use quire_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    fixed_responses: HashMap<String, String>,
    default_response: String,
    latency: Duration,
    failure: Option<String>,
}

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fixed_responses: HashMap::new(),
            default_response: "Mock response".to_string(),
            latency: Duration::ZERO,
            failure: None,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a fixed response for generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Answer prompts containing `needle` with `output`.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(needle.into(), output.into());
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Fail every call with an inference error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get number of generation calls.
    pub fn generate_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if let Some(message) = &self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        let mapped = self
            .config
            .fixed_responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, output)| output.clone());
        Ok(mapped.unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_generate() {
        let backend = MockGenerationBackend::new().with_fixed_response("Hello from mock");
        assert_eq!(backend.generate("any prompt").await.unwrap(), "Hello from mock");
        assert_eq!(backend.generate_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_response_mapping() {
        let backend = MockGenerationBackend::new().with_response_mapping("capital", "Paris");
        assert_eq!(
            backend.generate("What is the capital of France?").await.unwrap(),
            "Paris"
        );
        assert_eq!(backend.generate("Something else").await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let backend = MockGenerationBackend::new().with_failure("quota exceeded");
        assert!(matches!(
            backend.generate("x").await,
            Err(Error::Inference(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_clone_shares_call_log() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();
        clone.generate_with_system("sys", "p").await.unwrap();
        let calls = backend.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
    }
}
