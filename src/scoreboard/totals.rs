use super::types::{MetricsRecord, ScoreboardTotals};

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Sum counts, revenue and goals over every record.
///
/// Each field is summed independently; a non-finite value only drops its own
/// contribution. `goal` stays `None` unless at least one record carries a
/// finite goal: an unset goal propagates as unset, never as zero.
pub fn aggregate(records: &[MetricsRecord]) -> ScoreboardTotals {
    let mut totals = ScoreboardTotals::default();
    let mut goal_sum = 0.0;
    let mut goal_seen = false;

    for r in records {
        totals.counts.daily = totals.counts.daily.saturating_add(r.counts.daily);
        totals.counts.weekly = totals.counts.weekly.saturating_add(r.counts.weekly);
        totals.counts.monthly = totals.counts.monthly.saturating_add(r.counts.monthly);
        totals.revenue.daily += finite_or_zero(r.revenue.daily);
        totals.revenue.weekly += finite_or_zero(r.revenue.weekly);
        totals.revenue.monthly += finite_or_zero(r.revenue.monthly);

        if let Some(goal) = r.goal.filter(|g| g.is_finite()) {
            goal_sum += goal;
            goal_seen = true;
        }
    }

    totals.goal = goal_seen.then_some(goal_sum);
    totals
}
