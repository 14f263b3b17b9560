//! # applydiary-api
//!
//! HTTP API for ApplyDiary, a personal job-application tracker.
//!
//! The crate is split the usual way: [`services`] hold the business rules
//! and talk to the repository traits, [`handlers`] adapt them to HTTP, and
//! [`routes::build_router`] wires everything behind the bearer guard in
//! [`auth`]. The binary in `main.rs` only loads configuration and serves.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{AppEnv, ServerConfig};
pub use error::ApiError;
pub use logging::init_tracing;
pub use routes::build_router;
pub use state::{AppState, Backends};
