use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::session::session_token_from_headers;
use crate::server::AppState;
use crate::types::SessionUser;

/// Extractor that requires a live session with the users service.
pub struct RequireSession {
    pub user: SessionUser,
}

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    InvalidSession,
    IdentityUnavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSession => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::InvalidSession => (StatusCode::UNAUTHORIZED, "Session expired or invalid"),
            AuthError::IdentityUnavailable => {
                (StatusCode::BAD_GATEWAY, "Identity service unavailable")
            }
        };

        let body = json!({ "data": null, "error": message });
        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_token =
            session_token_from_headers(&parts.headers).ok_or(AuthError::MissingSession)?;

        let user = state
            .identity
            .current_user(&session_token)
            .await
            .map_err(|e| {
                tracing::warn!("Session lookup failed: {e}");
                AuthError::IdentityUnavailable
            })?
            .ok_or(AuthError::InvalidSession)?;

        Ok(RequireSession { user })
    }
}
