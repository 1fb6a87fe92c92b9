use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::{LoginInput, LoginSuccess};
use super::AuthService;
use crate::error::{AppError, AuthErrorCode};

/// Login-form state on top of an [`AuthService`].
///
/// Tracks whether a login is in flight and whether the last checked account
/// needs a 2FA code. Non-auth failures surface as `UNKNOWN` so the form only
/// ever deals with the four auth codes.
pub struct LoginFlow {
    auth: Arc<dyn AuthService>,
    loading: AtomicBool,
    two_fa_required: AtomicBool,
}

/// Clears the loading flag on every exit path, including cancellation.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LoginFlow {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self {
            auth,
            loading: AtomicBool::new(false),
            two_fa_required: AtomicBool::new(false),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn two_fa_required(&self) -> bool {
        self.two_fa_required.load(Ordering::Acquire)
    }

    /// Ask whether `login` needs a code. Lookup failures read as "no".
    pub async fn check_two_fa(&self, login: &str) -> bool {
        let required = match self.auth.check_two_fa(login).await {
            Ok(res) => res.required,
            Err(e) => {
                tracing::debug!(error = %e, "2FA lookup failed, assuming not required");
                false
            }
        };
        self.two_fa_required.store(required, Ordering::Release);
        required
    }

    pub async fn login(&self, input: &LoginInput) -> Result<LoginSuccess, AppError> {
        self.loading.store(true, Ordering::Release);
        let _guard = LoadingGuard(&self.loading);

        match self.auth.login(input).await {
            Ok(success) => {
                tracing::info!(user_id = %success.user_id, "Login succeeded");
                Ok(success)
            }
            Err(e @ AppError::Auth { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Login failed unexpectedly");
                Err(AppError::auth(AuthErrorCode::Unknown, "Unexpected error"))
            }
        }
    }
}
