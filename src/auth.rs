//! Bearer-token identity: request extractors plus the register/me endpoints.

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{CurrentUser, UserId};

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor for routes that require an authenticated caller.
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let account = state
            .user_by_token(token)
            .await
            .ok_or(ApiError::Unauthorized)?;
        Ok(account.into())
    }
}

/// Optional identity. Guests come through as `None`; a stale or unknown
/// token degrades to anonymous instead of failing the request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(Self(state.user_by_token(token).await.map(Into::into))),
            None => Ok(Self(None)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub username: String,
    pub token: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let account = state.register_user(&body.username).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: account.id,
            username: account.username,
            token: account.token,
        }),
    ))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
