pub mod display;
pub mod generator;
pub mod local;
pub mod query;
pub mod remote;
pub mod totals;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, Backend};
use crate::error::AppError;
use crate::http::ApiClient;
use types::{ScoreboardQuery, ScoreboardResponse};

// =============================================================================
// ScoreService trait
// =============================================================================

/// Public contract the dashboard calls to fetch a leaderboard.
///
/// Both implementations take the same query shape, apply the same defaults
/// (`monthly` / `desc` / `7`) and return the same response shape: the sorted,
/// limited rows plus totals over the tab's full dataset.
#[async_trait]
pub trait ScoreService: Send + Sync {
    /// Short label for logs (`"local"` or `"remote"`).
    fn backend_name(&self) -> &'static str;

    async fn get_scoreboard(&self, query: &ScoreboardQuery) -> Result<ScoreboardResponse, AppError>;
}

// =============================================================================
// Factory
// =============================================================================

/// Build the score service for `backend`. Called once at startup.
pub fn create_score_service(
    backend: &Backend,
    config: &AppConfig,
) -> Result<Arc<dyn ScoreService>, AppError> {
    let svc: Arc<dyn ScoreService> = match backend {
        Backend::Local => Arc::new(local::LocalScoreService::new(config.datasets.clone())),
        Backend::Remote { base_url } => Arc::new(remote::HttpScoreService::new(ApiClient::new(
            base_url,
            config.http_timeout,
        )?)),
    };
    tracing::info!(backend = svc.backend_name(), "Score service ready");
    Ok(svc)
}
