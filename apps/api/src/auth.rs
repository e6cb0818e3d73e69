//! Bearer-token authentication.
//!
//! Every analysis route takes an `AuthUser` extractor, so a request never
//! reaches the pipeline without a resolved user id.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token rejected")]
    InvalidToken,

    #[error("Identity backend failure: {0}")]
    Backend(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken => AppError::Unauthorized,
            AuthError::Backend(msg) => AppError::Identity(msg),
        }
    }
}

/// Resolves an identity token to a stable user id.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Verifies ID tokens through the identity toolkit `accounts:lookup` method.
#[derive(Clone)]
pub struct IdentityToolkitVerifier {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupError {
    error: LookupErrorBody,
}

#[derive(Deserialize)]
struct LookupErrorBody {
    #[serde(default)]
    message: String,
}

/// Error messages that mean the token itself is bad. Anything else on a 400
/// (e.g. an invalid API key) is a server-side misconfiguration.
const TOKEN_REJECTIONS: [&str; 3] = ["INVALID_ID_TOKEN", "USER_NOT_FOUND", "TOKEN_EXPIRED"];

fn is_token_rejection(body: &str) -> bool {
    serde_json::from_str::<LookupError>(body)
        .map(|e| {
            TOKEN_REJECTIONS
                .iter()
                .any(|code| e.error.message.starts_with(code))
        })
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

impl IdentityToolkitVerifier {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl TokenVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(format!("{}/v1/accounts:lookup", self.endpoint))
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 400 {
            let body = response.text().await.unwrap_or_default();
            if is_token_rejection(&body) {
                debug!("Identity backend rejected token");
                return Err(AuthError::InvalidToken);
            }
            warn!("Identity backend returned 400: {body}");
            return Err(AuthError::Backend(format!("status {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Identity backend returned {status}: {body}");
            return Err(AuthError::Backend(format!("status {status}")));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        lookup
            .users
            .into_iter()
            .next()
            .map(|u| u.local_id)
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::InvalidToken)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let user_id = state.verifier.verify(token).await?;
        Ok(AuthUser { user_id })
    }
}
