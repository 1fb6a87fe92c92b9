pub mod flow;
pub mod mock;
pub mod remote;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, Backend};
use crate::error::AppError;
use crate::http::ApiClient;
use types::{LoginInput, LoginSuccess, TwoFaRequired};

/// Login contract used by the dashboard. Failures are `AppError::Auth`
/// carrying one of the [`crate::error::AuthErrorCode`] values.
#[async_trait]
pub trait AuthService: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn check_two_fa(&self, login: &str) -> Result<TwoFaRequired, AppError>;

    async fn login(&self, input: &LoginInput) -> Result<LoginSuccess, AppError>;

    async fn logout(&self) -> Result<(), AppError>;
}

pub fn create_auth_service(
    backend: &Backend,
    config: &AppConfig,
) -> Result<Arc<dyn AuthService>, AppError> {
    Ok(match backend {
        Backend::Local => Arc::new(mock::MockAuthService::new(config.mock_auth_latency)),
        Backend::Remote { base_url } => Arc::new(remote::HttpAuthService::new(ApiClient::new(
            base_url,
            config.http_timeout,
        )?)),
    })
}
