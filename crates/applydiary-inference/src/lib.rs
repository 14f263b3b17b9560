//! # applydiary-inference
//!
//! Text-generation backends for ApplyDiary's follow-up drafts.
//!
//! This crate provides:
//! - An OpenAI-compatible chat-completions backend (feature `openai`, default)
//! - A deterministic mock backend (feature `mock`, always on in unit tests)
//!
//! Both implement [`GenerationBackend`]. Provider throttling surfaces as
//! [`Error::QuotaExceeded`]; every other provider failure is
//! [`Error::Upstream`].

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use applydiary_core::*;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockGenerationBackend};
