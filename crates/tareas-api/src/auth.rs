//! Bearer-token identity extractor.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use serde::Deserialize;
use tareas_core::models::UserId;
use tareas_core::repository::Repository;

use crate::{error::ApiError, AppState};

/// Tokens accepted by this server instance and the user each one identifies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: HashMap<String, UserId>,
}

impl AuthConfig {
    pub fn user_for(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).copied()
    }
}

/// The authenticated caller. Present in a handler means the request carried a
/// known token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Resolve the caller from an `Authorization: Bearer <token>` header.
pub fn verify_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<UserId, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(ApiError::Unauthorized)?;

    config.user_for(token).ok_or(ApiError::Unauthorized)
}

impl<R> FromRequestParts<AppState<R>> for CurrentUser
where
    R: Repository + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState<R>) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(&parts.headers, &state.auth)?;
        Ok(CurrentUser(user))
    }
}
