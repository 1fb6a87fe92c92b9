pub mod mock;
pub mod remote;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, Backend};
use crate::error::AppError;
use crate::http::ApiClient;
use crate::scoreboard::types::ScoreTab;
use types::{GroupDto, UpsertGroupInput};

/// Agent groups shown as filters on the scoreboard.
#[async_trait]
pub trait GroupService: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// All groups, or only those pinned to `tab`.
    async fn list(&self, tab: Option<ScoreTab>) -> Result<Vec<GroupDto>, AppError>;

    async fn create(&self, input: &UpsertGroupInput) -> Result<GroupDto, AppError>;

    async fn remove(&self, id: &str) -> Result<(), AppError>;
}

pub fn create_group_service(
    backend: &Backend,
    config: &AppConfig,
) -> Result<Arc<dyn GroupService>, AppError> {
    Ok(match backend {
        Backend::Local => Arc::new(mock::MockGroupService::new()),
        Backend::Remote { base_url } => Arc::new(remote::HttpGroupService::new(ApiClient::new(
            base_url,
            config.http_timeout,
        )?)),
    })
}
