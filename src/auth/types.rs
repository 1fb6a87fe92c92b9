use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginInput {
    pub login: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub code2fa: Option<String>,
}

impl LoginInput {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            code2fa: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code2fa = Some(code.into());
        self
    }

    /// A blank code counts as no code.
    pub fn has_code(&self) -> bool {
        self.code2fa.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginSuccess {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TwoFaRequired {
    pub required: bool,
}
