use async_trait::async_trait;
use reqwest::StatusCode;

use super::types::{LoginInput, LoginSuccess, TwoFaRequired};
use super::AuthService;
use crate::error::{AppError, AuthErrorCode};
use crate::http::{ApiClient, ApiFailure};

/// Auth backed by `/auth/*` endpoints.
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn check_failure(failure: ApiFailure) -> AppError {
    match failure.status() {
        Some(status) => AppError::auth(
            AuthErrorCode::Network,
            format!("Auth check failed: {}", status.as_u16()),
        ),
        None => AppError::auth(AuthErrorCode::Unknown, "Auth check failed"),
    }
}

/// 401 and 409 carry meaning on their own; the body `code` is honoured for
/// servers that answer with a generic status.
fn login_failure(failure: ApiFailure) -> AppError {
    let Some(status) = failure.status() else {
        return AppError::auth(AuthErrorCode::Unknown, "Login failed");
    };
    let code = failure.body_code().and_then(AuthErrorCode::from_wire);

    if status == StatusCode::UNAUTHORIZED || code == Some(AuthErrorCode::InvalidCredentials) {
        return AppError::auth(AuthErrorCode::InvalidCredentials, "Invalid credentials");
    }
    if status == StatusCode::CONFLICT || code == Some(AuthErrorCode::TwofaRequired) {
        return AppError::auth(AuthErrorCode::TwofaRequired, "2FA code required");
    }
    AppError::auth(
        AuthErrorCode::Network,
        format!("Login failed: {}", status.as_u16()),
    )
}

#[async_trait]
impl AuthService for HttpAuthService {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn check_two_fa(&self, login: &str) -> Result<TwoFaRequired, AppError> {
        let req = self
            .api
            .request(reqwest::Method::GET, "/auth/2fa-required")
            .query(&[("login", login)]);
        self.api.send_json(req).await.map_err(check_failure)
    }

    async fn login(&self, input: &LoginInput) -> Result<LoginSuccess, AppError> {
        let req = self
            .api
            .request(reqwest::Method::POST, "/auth/login")
            .json(input);
        self.api.send_json(req).await.map_err(|failure| {
            let err = login_failure(failure);
            tracing::info!(code = ?err.auth_code(), "Login rejected");
            err
        })
    }

    /// Sessions are bearer tokens held by the caller; nothing to revoke
    /// server-side.
    async fn logout(&self) -> Result<(), AppError> {
        Ok(())
    }
}
