use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::types::{LoginInput, LoginSuccess, TwoFaRequired};
use super::AuthService;
use crate::error::{AppError, AuthErrorCode};

/// Logins matching this pattern are treated as 2FA-protected accounts.
fn two_fa_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)2fa|admin|secure").expect("valid regex"))
}

/// Offline auth for demos and local development.
pub struct MockAuthService {
    latency: Duration,
}

impl MockAuthService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn requires_two_fa(login: &str) -> bool {
        two_fa_pattern().is_match(login)
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn check_two_fa(&self, login: &str) -> Result<TwoFaRequired, AppError> {
        Ok(TwoFaRequired {
            required: Self::requires_two_fa(login),
        })
    }

    async fn login(&self, input: &LoginInput) -> Result<LoginSuccess, AppError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if Self::requires_two_fa(&input.login) && !input.has_code() {
            return Err(AppError::auth(AuthErrorCode::TwofaRequired, "2FA code required"));
        }
        if input.login.is_empty() || input.password.is_empty() || input.password == "wrong" {
            return Err(AppError::auth(AuthErrorCode::InvalidCredentials, "Invalid credentials"));
        }

        Ok(LoginSuccess {
            user_id: "demo-user".into(),
            token: "demo-token".into(),
        })
    }

    async fn logout(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc() -> MockAuthService {
        MockAuthService::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_two_fa_detection_is_case_insensitive() {
        assert!(svc().check_two_fa("ADMIN.jane").await.unwrap().required);
        assert!(svc().check_two_fa("my-2FA-login").await.unwrap().required);
        assert!(svc().check_two_fa("SecureOps").await.unwrap().required);
        assert!(!svc().check_two_fa("jane").await.unwrap().required);
    }

    #[tokio::test]
    async fn test_two_fa_account_without_code() {
        let err = svc().login(&LoginInput::new("admin", "pw")).await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::TwofaRequired));
    }

    #[tokio::test]
    async fn test_two_fa_checked_before_password() {
        let err = svc().login(&LoginInput::new("admin", "wrong")).await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::TwofaRequired));

        let err = svc()
            .login(&LoginInput::new("admin", "wrong").with_code("123456"))
            .await
            .unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        for input in [
            LoginInput::new("", "pw"),
            LoginInput::new("jane", ""),
            LoginInput::new("jane", "wrong"),
        ] {
            let err = svc().login(&input).await.unwrap_err();
            assert_eq!(err.auth_code(), Some(AuthErrorCode::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_successful_login() {
        let ok = svc()
            .login(&LoginInput::new("secure-jane", "pw").with_code("000000"))
            .await
            .unwrap();
        assert_eq!(ok.user_id, "demo-user");
        assert_eq!(ok.token, "demo-token");
        svc().logout().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let svc = MockAuthService::new(Duration::from_millis(200));
        let started = tokio::time::Instant::now();
        svc.login(&LoginInput::new("jane", "pw")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
