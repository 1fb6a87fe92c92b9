use serde::Serialize;
use ts_rs::TS;

use super::types::{AgentId, MetricsRecord, ScoreboardResponse};

/// One leaderboard line as the table renders it: `aN` columns are counts,
/// the window columns are revenue.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ScoreboardRow {
    pub id: AgentId,
    pub agent: String,
    #[ts(type = "number")]
    pub a1: u64,
    pub daily: f64,
    #[ts(type = "number")]
    pub a2: u64,
    pub weekly: f64,
    #[ts(type = "number")]
    pub a3: u64,
    pub monthly: f64,
    /// Goal formatted for display, `"-"` when unset.
    pub goal: String,
}

impl From<&MetricsRecord> for ScoreboardRow {
    fn from(r: &MetricsRecord) -> Self {
        Self {
            id: r.agent_id.clone(),
            agent: r.agent_name.clone(),
            a1: r.counts.daily,
            daily: r.revenue.daily,
            a2: r.counts.weekly,
            weekly: r.revenue.weekly,
            a3: r.counts.monthly,
            monthly: r.revenue.monthly,
            goal: format_goal(r.goal),
        }
    }
}

pub fn format_goal(goal: Option<f64>) -> String {
    match goal {
        Some(g) if g.is_finite() => format!("{g:.2}"),
        _ => "-".to_string(),
    }
}

/// Plain-text table for terminals and logs.
pub fn render_table(resp: &ScoreboardResponse) -> String {
    let mut out = format!(
        "{:<4} {:<22} {:>5} {:>11} {:>6} {:>11} {:>6} {:>12} {:>10}\n",
        "#", "AGENT", "D#", "DAILY", "W#", "WEEKLY", "M#", "MONTHLY", "GOAL"
    );
    for (rank, row) in resp.rows.iter().map(ScoreboardRow::from).enumerate() {
        out.push_str(&format!(
            "{:<4} {:<22} {:>5} {:>11.2} {:>6} {:>11.2} {:>6} {:>12.2} {:>10}\n",
            rank + 1,
            row.agent,
            row.a1,
            row.daily,
            row.a2,
            row.weekly,
            row.a3,
            row.monthly,
            row.goal
        ));
    }
    let t = &resp.totals;
    out.push_str(&format!(
        "{:<4} {:<22} {:>5} {:>11.2} {:>6} {:>11.2} {:>6} {:>12.2} {:>10}\n",
        "",
        "TOTAL",
        t.counts.daily,
        t.revenue.daily,
        t.counts.weekly,
        t.revenue.weekly,
        t.counts.monthly,
        t.revenue.monthly,
        format_goal(t.goal)
    ));
    out
}
