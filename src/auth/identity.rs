
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;
use crate::error::{Error, Result};
use crate::types::SessionUser;

/// The external users service that owns OAuth and sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser should be sent to in order to start an OAuth login.
    async fn redirect_url(&self, provider: &str) -> Result<String>;

    /// Exchanges an OAuth authorization code for a session token.
    async fn exchange_code(&self, code: &str) -> Result<String>;

    /// Resolves a session token. `Ok(None)` means the session is unknown or
    /// expired.
    async fn current_user(&self, session_token: &str) -> Result<Option<SessionUser>>;

    async fn delete_session(&self, session_token: &str) -> Result<()>;
}

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct RedirectUrlResponse {
    redirect_url: String,
}

#[derive(Debug, Serialize)]
struct ExchangeCodeRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExchangeCodeResponse {
    session_token: String,
}

/// HTTP client for the users service.
#[derive(Clone)]
pub struct UsersServiceClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl UsersServiceClient {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build identity client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

fn upstream(context: &str, e: reqwest::Error) -> Error {
    Error::Identity(format!("{context}: {e}"))
}

#[async_trait]
impl IdentityProvider for UsersServiceClient {
    async fn redirect_url(&self, provider: &str) -> Result<String> {
        let url = self.url(&format!(
            "/oauth/{}/redirect_url",
            urlencoding::encode(provider)
        ));

        let resp = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| upstream("redirect url request failed", e))?
            .error_for_status()
            .map_err(|e| upstream("redirect url rejected", e))?;

        let body: RedirectUrlResponse = resp
            .json()
            .await
            .map_err(|e| upstream("invalid redirect url response", e))?;
        Ok(body.redirect_url)
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/sessions"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&ExchangeCodeRequest { code })
            .send()
            .await
            .map_err(|e| upstream("session exchange failed", e))?;

        match resp.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                return Err(Error::Unauthorized);
            }
            status if !status.is_success() => {
                return Err(Error::Identity(format!(
                    "session exchange returned {status}"
                )));
            }
            _ => {}
        }

        let body: ExchangeCodeResponse = resp
            .json()
            .await
            .map_err(|e| upstream("invalid session exchange response", e))?;
        Ok(body.session_token)
    }

    async fn current_user(&self, session_token: &str) -> Result<Option<SessionUser>> {
        let resp = self
            .client
            .get(self.url("/users/me"))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(session_token)
            .send()
            .await
            .map_err(|e| upstream("user lookup failed", e))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user: SessionUser = resp
                    .json()
                    .await
                    .map_err(|e| upstream("invalid user response", e))?;
                Ok(Some(user))
            }
            status => Err(Error::Identity(format!("user lookup returned {status}"))),
        }
    }

    async fn delete_session(&self, session_token: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url("/sessions/current"))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(session_token)
            .send()
            .await
            .map_err(|e| upstream("session delete failed", e))?;

        // An already-gone session is as good as a deleted one.
        if resp.status().is_success() || resp.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(Error::Identity(format!(
            "session delete returned {}",
            resp.status()
        )))
    }
}
