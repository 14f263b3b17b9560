//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use applydiary_inference::mock::MockGenerationBackend;
//! use applydiary_inference::GenerationBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = MockGenerationBackend::new().with_fixed_response("Subject: Hello");
//! let draft = backend.generate_with_system("system", "prompt").await.unwrap();
//! assert_eq!(draft, "Subject: Hello");
//! assert_eq!(backend.call_count(), 1);
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use applydiary_core::{Error, GenerationBackend, Result};

/// How the mock should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockFailure {
    #[default]
    None,
    /// Behave like a provider answering HTTP 429.
    Quota,
    /// Behave like any other provider failure.
    Upstream,
}

/// A recorded generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
struct MockConfig {
    response: String,
    failure: MockFailure,
    latency_ms: u64,
    model: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            response: "Mock response".to_string(),
            failure: MockFailure::None,
            latency_ms: 0,
            model: "mock-gen".to_string(),
        }
    }
}

/// Mock generation backend. Clones share one call log.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned for every request.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = response.into();
        self
    }

    /// Make every request fail the given way.
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        Arc::make_mut(&mut self.config).failure = failure;
        self
    }

    /// Set simulated latency for each request.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<MockCall> {
        self.log().last().cloned()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.log().clear()
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        // A panicking test thread must not poison the log for the others
        self.call_log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        match self.config.failure {
            MockFailure::None => Ok(self.config.response.clone()),
            MockFailure::Quota => Err(Error::QuotaExceeded(
                "Simulated rate limit for testing".to_string(),
            )),
            MockFailure::Upstream => Err(Error::Upstream(
                "Simulated failure for testing".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
