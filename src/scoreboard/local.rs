use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::generator;
use super::query::select_rows;
use super::totals::aggregate;
use super::types::{MetricsRecord, ScoreTab, ScoreboardQuery, ScoreboardResponse, ScoreboardTotals};
use super::ScoreService;
use crate::error::AppError;

/// Size and seed of one tab's synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub count: usize,
    pub seed: u32,
}

impl DatasetSpec {
    /// `sales`: 1000 agents, seed 1. `retention`: 600 agents, seed 2.
    pub fn defaults() -> BTreeMap<ScoreTab, DatasetSpec> {
        BTreeMap::from([
            (ScoreTab::Sales, DatasetSpec { count: 1000, seed: 1 }),
            (ScoreTab::Retention, DatasetSpec { count: 600, seed: 2 }),
        ])
    }
}

/// A materialized tab: the full record set plus its totals, both fixed after
/// first access.
#[derive(Debug)]
pub struct TabDataset {
    pub records: Vec<MetricsRecord>,
    pub totals: ScoreboardTotals,
}

struct TabSlot {
    spec: DatasetSpec,
    dataset: OnceLock<TabDataset>,
}

/// Offline score service backed by deterministic synthetic data.
///
/// Each configured tab is generated on first query and cached for the life
/// of the instance. `OnceLock` guarantees concurrent first queries for the
/// same tab observe one dataset.
pub struct LocalScoreService {
    slots: HashMap<ScoreTab, TabSlot>,
}

impl LocalScoreService {
    pub fn new(specs: BTreeMap<ScoreTab, DatasetSpec>) -> Self {
        let slots = specs
            .into_iter()
            .map(|(tab, spec)| {
                (
                    tab,
                    TabSlot {
                        spec,
                        dataset: OnceLock::new(),
                    },
                )
            })
            .collect();
        Self { slots }
    }

    /// The full dataset for `tab`, generating it on first access.
    pub fn dataset(&self, tab: ScoreTab) -> Result<&TabDataset, AppError> {
        let slot = self
            .slots
            .get(&tab)
            .ok_or_else(|| AppError::NotFound(format!("no scoreboard dataset configured for tab '{tab}'")))?;

        Ok(slot.dataset.get_or_init(|| {
            let records = generator::generate(slot.spec.count, slot.spec.seed);
            let totals = aggregate(&records);
            tracing::debug!(
                tab = %tab,
                count = slot.spec.count,
                seed = slot.spec.seed,
                "Materialized synthetic scoreboard dataset"
            );
            TabDataset { records, totals }
        }))
    }

    pub fn is_materialized(&self, tab: ScoreTab) -> bool {
        self.slots
            .get(&tab)
            .is_some_and(|slot| slot.dataset.get().is_some())
    }

    /// Synchronous core of [`ScoreService::get_scoreboard`].
    pub fn scoreboard(&self, query: &ScoreboardQuery) -> Result<ScoreboardResponse, AppError> {
        let q = query.resolve();
        let dataset = self.dataset(q.tab)?;
        Ok(ScoreboardResponse {
            tab: q.tab,
            rows: select_rows(&dataset.records, q.sort, q.order, q.limit),
            totals: dataset.totals.clone(),
        })
    }
}

impl Default for LocalScoreService {
    fn default() -> Self {
        Self::new(DatasetSpec::defaults())
    }
}

#[async_trait]
impl ScoreService for LocalScoreService {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn get_scoreboard(&self, query: &ScoreboardQuery) -> Result<ScoreboardResponse, AppError> {
        self.scoreboard(query)
    }
}
