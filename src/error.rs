use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Machine-readable reason attached to authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthErrorCode {
    InvalidCredentials,
    TwofaRequired,
    Network,
    Unknown,
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthErrorCode::TwofaRequired => "TWOFA_REQUIRED",
            AuthErrorCode::Network => "NETWORK",
            AuthErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Parse the `code` field of a backend error body.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "INVALID_CREDENTIALS" => Some(AuthErrorCode::InvalidCredentials),
            "TWOFA_REQUIRED" => Some(AuthErrorCode::TwofaRequired),
            "NETWORK" => Some(AuthErrorCode::Network),
            "UNKNOWN" => Some(AuthErrorCode::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly so a frontend gets structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Normalized failure of a remote backend: bad status, network error or
    /// an undecodable body. Never carries a partial response.
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Auth {
        code: AuthErrorCode,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn auth(code: AuthErrorCode, message: impl Into<String>) -> Self {
        AppError::Auth {
            code,
            message: message.into(),
        }
    }

    /// The auth code, when this is an authentication failure.
    pub fn auth_code(&self) -> Option<AuthErrorCode> {
        match self {
            AppError::Auth { code, .. } => Some(*code),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Config(_) => "config",
            AppError::Transport(_) => "transport",
            AppError::Auth { .. } => "auth",
            AppError::Serde(_) => "serde",
            AppError::Internal(_) => "internal",
        }
    }
}

/// We serialize as `{ error: "...", kind: "..." }` (plus `code` for auth
/// failures) for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let code = self.auth_code();
        let len = if code.is_some() { 3 } else { 2 };
        let mut s = serializer.serialize_struct("AppError", len)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        if let Some(code) = code {
            s.serialize_field("code", code.as_str())?;
        }
        s.end()
    }
}
