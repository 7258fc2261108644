use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{
    RequireSession, expired_session_cookie, session_cookie, session_token_from_headers,
};
use crate::server::AppState;
use crate::server::dto::{CreateSessionRequest, RedirectUrlResponse, SuccessResponse, UserResponse};
use crate::server::response::{ApiError, ApiResponse};
use crate::server::validation::validate_code;

const OAUTH_PROVIDER: &str = "google";

pub async fn google_redirect_url(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let redirect_url = state.identity.redirect_url(OAUTH_PROVIDER).await?;

    Ok::<_, ApiError>(Json(ApiResponse::success(RedirectUrlResponse {
        redirect_url,
    })))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    validate_code(&req.code)?;

    let session_token = state.identity.exchange_code(req.code.trim()).await?;
    tracing::debug!("session created");

    Ok::<_, ApiError>((
        jar.add(session_cookie(session_token)),
        Json(ApiResponse::success(SuccessResponse::ok())),
    ))
}

pub async fn current_user(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let is_admin = state.ledger.is_admin(&auth.user);

    Json(ApiResponse::success(UserResponse {
        user: auth.user,
        is_admin,
    }))
}

/// Ends the session upstream and clears the cookie. Always succeeds locally
/// so a browser can never get stuck signed in.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(token) = session_token_from_headers(&headers) {
        if let Err(e) = state.identity.delete_session(&token).await {
            tracing::warn!("Failed to delete upstream session: {e}");
        }
    }

    (
        jar.add(expired_session_cookie()),
        Json(ApiResponse::success(SuccessResponse::ok())),
    )
}
