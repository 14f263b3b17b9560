//! # applydiary-crypto
//!
//! Identity tokens and password hashing for ApplyDiary.
//!
//! ## Primitives
//!
//! - **Tokens**: HS256 JWT carrying `sub`, `email`, `iat`, `exp`
//! - **Passwords**: Argon2id, stored as PHC strings
//!
//! ## Example
//!
//! ```rust
//! use applydiary_crypto::{TokenCodec, TokenConfig};
//! use uuid::Uuid;
//!
//! let codec = TokenCodec::new(TokenConfig::with_secret("dev-secret")).unwrap();
//! let user_id = Uuid::new_v4();
//! let token = codec.issue(user_id, "a@x.com").unwrap();
//! assert_eq!(codec.verify(&token).unwrap().user_id, user_id);
//! ```

pub mod error;
pub mod password;
pub mod token;

pub use error::{CryptoError, CryptoResult};
pub use password::{hash_password, verify_password, HashParams};
pub use token::{TokenCodec, TokenConfig};
