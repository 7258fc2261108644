use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const SESSION_COOKIE: &str = "calcmeter_session";
pub const SESSION_MAX_AGE_DAYS: i64 = 60;

/// Session cookie for cross-site use: HTTP-only, `Secure`, `SameSite=None`.
#[must_use]
pub fn session_cookie(token: impl Into<String>) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Same attributes as [`session_cookie`] with an empty value and zero max-age,
/// so browsers drop it.
#[must_use]
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Finds the session token in the session cookie, falling back to a
/// `Bearer` authorization header for non-browser clients.
#[must_use]
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
