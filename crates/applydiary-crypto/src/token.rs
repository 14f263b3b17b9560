//! Signed, time-limited identity tokens (HS256 JWT).
//!
//! A token carries `sub` (user id), `email`, `iat` and `exp`. There is no
//! refresh or revocation: a token is valid until `exp`, with zero leeway.

use applydiary_core::defaults::TOKEN_TTL_SECS;
use applydiary_core::Identity;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CryptoError, CryptoResult};

/// Token signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Secret with the default 7 day validity window.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(secret, Duration::seconds(TOKEN_TTL_SECS))
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies identity tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec. An empty secret, or a TTL that is not positive or
    /// overflows the calendar, is rejected.
    pub fn new(config: TokenConfig) -> CryptoResult<Self> {
        if config.secret.is_empty() {
            return Err(CryptoError::InvalidSecret("secret must not be empty".into()));
        }
        if config.ttl <= Duration::zero() {
            return Err(CryptoError::InvalidSecret(
                "token lifetime must be positive".into(),
            ));
        }
        if Utc::now().checked_add_signed(config.ttl).is_none() {
            return Err(CryptoError::InvalidSecret(
                "token lifetime is out of range".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid from now.
    pub fn issue(&self, user_id: Uuid, email: &str) -> CryptoResult<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> CryptoResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(CryptoError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CryptoError::InvalidToken(e.to_string()))
    }

    /// Verify signature and expiry, returning the carried identity.
    pub fn verify(&self, token: &str) -> CryptoResult<Identity> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CryptoError::ExpiredToken,
                other => CryptoError::InvalidToken(format!("{:?}", other)),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| CryptoError::InvalidToken("subject is not a uuid".into()))?;

        Ok(Identity {
            user_id,
            email: data.claims.email,
        })
    }
}
