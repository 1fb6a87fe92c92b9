use std::sync::Mutex;

use async_trait::async_trait;
use rand::Rng;

use super::types::{GroupDto, UpsertGroupInput};
use super::GroupService;
use crate::error::AppError;
use crate::scoreboard::types::ScoreTab;
use crate::validation::{require_non_empty, require_valid_id};

/// In-memory group store; insertion order is list order.
#[derive(Default)]
pub struct MockGroupService {
    store: Mutex<Vec<GroupDto>>,
}

impl MockGroupService {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `g_<epoch millis>_<4 base36 chars>`.
fn new_group_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("g_{millis}_{suffix}")
}

#[async_trait]
impl GroupService for MockGroupService {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn list(&self, tab: Option<ScoreTab>) -> Result<Vec<GroupDto>, AppError> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        Ok(store
            .iter()
            .filter(|g| tab.is_none() || g.tab == tab)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &UpsertGroupInput) -> Result<GroupDto, AppError> {
        require_non_empty("name", &input.name)?;

        let group = GroupDto {
            id: new_group_id(),
            name: input.name.clone(),
            member_agent_ids: input.member_agent_ids.clone(),
            tab: input.tab,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.push(group.clone());
        tracing::debug!(id = %group.id, members = group.member_agent_ids.len(), "Group created");
        Ok(group)
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        require_valid_id("id", id)?;
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.retain(|g| g.id != id);
        Ok(())
    }
}
