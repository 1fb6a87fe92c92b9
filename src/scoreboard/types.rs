use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::AppError;

/// Rows shown when a query does not say otherwise.
pub const DEFAULT_LIMIT: i32 = 7;

// ============================================================================
// Query vocabulary
// ============================================================================

/// Named partition of the scoreboard; each tab has its own record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTab {
    Sales,
    Retention,
}

impl ScoreTab {
    pub const ALL: [ScoreTab; 2] = [ScoreTab::Sales, ScoreTab::Retention];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTab::Sales => "sales",
            ScoreTab::Retention => "retention",
        }
    }
}

impl fmt::Display for ScoreTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sales" => Ok(ScoreTab::Sales),
            "retention" => Ok(ScoreTab::Retention),
            other => Err(AppError::Validation(format!(
                "unknown scoreboard tab '{other}' (expected sales or retention)"
            ))),
        }
    }
}

/// Rolling aggregation period for counts and revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Daily => "daily",
            Window::Weekly => "weekly",
            Window::Monthly => "monthly",
        }
    }
}

impl FromStr for Window {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "daily" => Ok(Window::Daily),
            "weekly" => Ok(Window::Weekly),
            "monthly" => Ok(Window::Monthly),
            other => Err(AppError::Validation(format!("unknown sort window '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::Validation(format!("unknown sort order '{other}'"))),
        }
    }
}

/// Public query accepted by every score service backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreboardQuery {
    pub tab: ScoreTab,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub limit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sort: Option<Window>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub order: Option<SortOrder>,
}

/// A query with every default applied. Both backends go through
/// [`ScoreboardQuery::resolve`] so defaulting cannot drift between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub tab: ScoreTab,
    pub sort: Window,
    pub order: SortOrder,
    pub limit: i32,
}

impl ScoreboardQuery {
    pub fn new(tab: ScoreTab) -> Self {
        Self {
            tab,
            limit: None,
            sort: None,
            order: None,
        }
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort: Window) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Build a query from loosely-typed string parameters (CLI args, URL
    /// query strings). Unknown values fail fast instead of defaulting.
    pub fn from_params(
        tab: &str,
        sort: Option<&str>,
        order: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, AppError> {
        let limit = limit
            .map(|raw| {
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::Validation(format!("limit must be an integer, got '{raw}'")))
            })
            .transpose()?;
        Ok(Self {
            tab: tab.parse()?,
            limit,
            sort: sort.map(str::parse::<Window>).transpose()?,
            order: order.map(str::parse::<SortOrder>).transpose()?,
        })
    }

    pub fn resolve(&self) -> ResolvedQuery {
        ResolvedQuery {
            tab: self.tab,
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Opaque agent identifier; backends send either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum AgentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Number(n) => write!(f, "{n}"),
            AgentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        AgentId::Text(value)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        AgentId::Text(value.to_string())
    }
}

/// Event counts per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WindowCounts {
    #[serde(default, deserialize_with = "lenient_count")]
    #[ts(type = "number")]
    pub daily: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    #[ts(type = "number")]
    pub weekly: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    #[ts(type = "number")]
    pub monthly: u64,
}

/// Monetary value per window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WindowRevenue {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub daily: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub weekly: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly: f64,
}

impl WindowRevenue {
    pub fn get(&self, window: Window) -> f64 {
        match window {
            Window::Daily => self.daily,
            Window::Weekly => self.weekly,
            Window::Monthly => self.monthly,
        }
    }
}

impl WindowCounts {
    pub fn get(&self, window: Window) -> u64 {
        match window {
            Window::Daily => self.daily,
            Window::Weekly => self.weekly,
            Window::Monthly => self.monthly,
        }
    }
}

/// Per-agent metrics returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub agent_id: AgentId,
    pub agent_name: String,
    #[serde(default)]
    pub counts: WindowCounts,
    #[serde(default)]
    pub revenue: WindowRevenue,
    /// `None` means "no goal set", which is not the same as a goal of zero.
    #[serde(default)]
    pub goal: Option<f64>,
}

/// Aggregated totals over the FULL dataset (not only the limited slice).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreboardTotals {
    #[serde(default)]
    pub counts: WindowCounts,
    #[serde(default)]
    pub revenue: WindowRevenue,
    #[serde(default)]
    pub goal: Option<f64>,
}

/// Limited rows for display plus full totals for badges and summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreboardResponse {
    pub tab: ScoreTab,
    pub rows: Vec<MetricsRecord>,
    pub totals: ScoreboardTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DepositEventType {
    #[default]
    Deposit,
}

/// Real-time deposit event pushed to the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DepositEvent {
    #[serde(rename = "type", default)]
    pub event_type: DepositEventType,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
}

// ── Tolerant numeric decoding ───────────────────────────────────────────

/// Missing, `null`, negative or non-finite counts decode as zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    })
}

/// Missing, `null` or non-finite amounts decode as zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}
