//! Bearer authentication.
//!
//! [`require_auth`] runs in front of every protected route, verifies the
//! token and stores the [`Identity`] in request extensions. Handlers read
//! it back through the [`AuthUser`] extractor.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use applydiary_core::{Error, Identity};

use crate::error::ApiError;
use crate::state::AppState;

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthenticated("missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| Error::Unauthenticated("non-ascii authorization header".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::Unauthenticated("malformed authorization header".to_string()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::Unauthenticated(format!(
            "unsupported authorization scheme {:?}",
            scheme
        )));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Unauthenticated("empty bearer token".to_string()));
    }
    Ok(token)
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = {
        let token = bearer_token(request.headers())?;
        state.codec.verify(token).map_err(Error::from)?
    };
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// The authenticated user of a request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| Error::Unauthenticated("route is not behind require_auth".to_string()).into())
    }
}
