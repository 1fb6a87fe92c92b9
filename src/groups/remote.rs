use async_trait::async_trait;

use super::types::{GroupDto, UpsertGroupInput};
use super::GroupService;
use crate::error::AppError;
use crate::http::{ApiClient, ApiFailure};
use crate::scoreboard::types::ScoreTab;
use crate::validation::{require_non_empty, require_valid_id};

fn groups_err(failure: ApiFailure) -> AppError {
    match failure.status() {
        Some(status) => AppError::Transport(format!("Groups HTTP {}", status.as_u16())),
        None => AppError::Transport(format!("Groups request failed: {failure}")),
    }
}

/// Groups backed by the `/groups` REST resource.
pub struct HttpGroupService {
    api: ApiClient,
}

impl HttpGroupService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl GroupService for HttpGroupService {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    /// `GET /groups[?tab=]`
    async fn list(&self, tab: Option<ScoreTab>) -> Result<Vec<GroupDto>, AppError> {
        let mut req = self.api.request(reqwest::Method::GET, "/groups");
        if let Some(tab) = tab {
            req = req.query(&[("tab", tab.as_str())]);
        }
        self.api.send_json(req).await.map_err(groups_err)
    }

    /// `POST /groups`
    async fn create(&self, input: &UpsertGroupInput) -> Result<GroupDto, AppError> {
        require_non_empty("name", &input.name)?;
        let req = self.api.request(reqwest::Method::POST, "/groups").json(input);
        self.api.send_json(req).await.map_err(groups_err)
    }

    /// `DELETE /groups/:id`
    async fn remove(&self, id: &str) -> Result<(), AppError> {
        require_valid_id("id", id)?;
        let path = format!("/groups/{}", urlencoding::encode(id));
        self.api
            .send_ok(self.api.request(reqwest::Method::DELETE, &path))
            .await
            .map_err(|failure| match failure.status() {
                Some(status) => AppError::Transport(format!("Group delete {}", status.as_u16())),
                None => groups_err(failure),
            })
    }
}
