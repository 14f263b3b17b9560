//! Registration, login, and profile management.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use applydiary_core::validation::{LoginPayload, ProfilePayload, RegisterPayload};
use applydiary_core::{Error, NewUser, ResourceKind, Result, User, UserProfile, UserRepository};
use applydiary_crypto::{hash_password, verify_password, HashParams, TokenCodec};

/// A freshly issued token and the profile it belongs to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
    hash_params: HashParams,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, codec: Arc<TokenCodec>, hash_params: HashParams) -> Self {
        Self {
            users,
            codec,
            hash_params,
        }
    }

    /// Create an account and sign it in.
    ///
    /// The store is the uniqueness authority: a concurrent registration of
    /// the same email loses with [`Error::DuplicateEmail`] at insert time.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthSession> {
        let registration = payload.validate()?;

        let password = registration.password;
        let params = self.hash_params.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, &params))
            .await
            .map_err(|e| Error::Internal(format!("Hashing task failed: {}", e)))??;

        let user = self
            .users
            .insert(NewUser {
                email: registration.email,
                password_hash,
                name: registration.name,
                timezone: registration.timezone,
            })
            .await?;

        info!(
            subsystem = "auth",
            op = "register",
            user_id = %user.id,
            "User registered"
        );
        self.session_for(user)
    }

    /// Exchange credentials for a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, payload: LoginPayload) -> Result<AuthSession> {
        let credentials = payload.validate()?;

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            debug!(subsystem = "auth", op = "login", auth_failure = "unknown_email", "Login rejected");
            return Err(Error::InvalidCredentials);
        };

        let password = credentials.password;
        let phc = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &phc))
            .await
            .map_err(|e| Error::Internal(format!("Verification task failed: {}", e)))??;

        if !valid {
            debug!(
                subsystem = "auth",
                op = "login",
                user_id = %user.id,
                auth_failure = "wrong_password",
                "Login rejected"
            );
            return Err(Error::InvalidCredentials);
        }

        self.session_for(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.users
            .fetch(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(Error::NotFound(ResourceKind::User))
    }

    pub async fn update_profile(&self, user_id: Uuid, payload: ProfilePayload) -> Result<UserProfile> {
        let name = payload.validate()?;
        self.users
            .update_name(user_id, &name)
            .await?
            .map(UserProfile::from)
            .ok_or(Error::NotFound(ResourceKind::User))
    }

    fn session_for(&self, user: User) -> Result<AuthSession> {
        let token = self.codec.issue(user.id, &user.email)?;
        Ok(AuthSession {
            token,
            user: user.into(),
        })
    }
}
