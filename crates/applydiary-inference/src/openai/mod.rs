//! OpenAI-compatible generation backend.
//!
//! Talks to any endpoint that speaks the chat-completions protocol. The
//! public OpenAI API is the default; `OPENAI_BASE_URL` points it elsewhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use applydiary_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use applydiary_inference::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() -> applydiary_inference::Result<()> {
//!     let Some(config) = OpenAIConfig::from_env() else {
//!         return Ok(());
//!     };
//!     let backend = OpenAIBackend::new(config)?;
//!     let draft = backend
//!         .generate_with_system("Be concise.", "Draft a thank-you note.")
//!         .await?;
//!     println!("{}", draft);
//!     Ok(())
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::{to_core_error, OpenAIErrorCode};
pub use types::*;
