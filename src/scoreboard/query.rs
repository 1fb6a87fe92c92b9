use std::cmp::Ordering;

use super::types::{MetricsRecord, SortOrder, Window};

fn sort_value(record: &MetricsRecord, window: Window) -> f64 {
    let v = record.revenue.get(window);
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Sort by one revenue window and keep the first `limit` records.
///
/// The input slice is never reordered; the returned rows are clones. The sort
/// is stable, so records with equal values keep their dataset order.
/// `limit <= 0` yields no rows, a limit past the end yields all of them.
pub fn select_rows(
    records: &[MetricsRecord],
    sort: Window,
    order: SortOrder,
    limit: i32,
) -> Vec<MetricsRecord> {
    let take = usize::try_from(limit).unwrap_or(0).min(records.len());
    if take == 0 {
        return Vec::new();
    }

    let mut view: Vec<&MetricsRecord> = records.iter().collect();
    view.sort_by(|a, b| {
        let ord = sort_value(a, sort)
            .partial_cmp(&sort_value(b, sort))
            .unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    view.into_iter().take(take).cloned().collect()
}
