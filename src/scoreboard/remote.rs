use async_trait::async_trait;

use super::types::{ResolvedQuery, ScoreboardQuery, ScoreboardResponse};
use super::ScoreService;
use crate::error::AppError;
use crate::http::{ApiClient, ApiFailure};

/// Score service that delegates to `GET {base}/scoreboard`.
pub struct HttpScoreService {
    api: ApiClient,
}

impl HttpScoreService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Query parameters for a resolved query. Defaults are always sent
    /// explicitly so a server cannot apply different ones.
    pub fn query_params(q: &ResolvedQuery) -> [(&'static str, String); 4] {
        [
            ("tab", q.tab.as_str().to_string()),
            ("limit", q.limit.to_string()),
            ("sort", q.sort.as_str().to_string()),
            ("order", q.order.as_str().to_string()),
        ]
    }
}

fn normalize(failure: ApiFailure) -> AppError {
    match failure.status() {
        Some(status) => {
            tracing::warn!(status = status.as_u16(), "Scoreboard request rejected");
            AppError::Transport(format!("Scoreboard HTTP {}", status.as_u16()))
        }
        None => {
            tracing::warn!(error = %failure, "Scoreboard request failed");
            AppError::Transport("Scoreboard fetch failed".into())
        }
    }
}

/// Reject bodies that decoded but do not answer the query that was sent.
fn check_response(q: &ResolvedQuery, resp: &ScoreboardResponse) -> Result<(), AppError> {
    let max_rows = usize::try_from(q.limit).unwrap_or(0);
    if resp.tab != q.tab || resp.rows.len() > max_rows {
        tracing::warn!(
            requested_tab = %q.tab,
            returned_tab = %resp.tab,
            rows = resp.rows.len(),
            limit = q.limit,
            "Scoreboard response does not match request"
        );
        return Err(AppError::Transport("Scoreboard response malformed".into()));
    }
    Ok(())
}

#[async_trait]
impl ScoreService for HttpScoreService {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn get_scoreboard(&self, query: &ScoreboardQuery) -> Result<ScoreboardResponse, AppError> {
        let q = query.resolve();
        let req = self
            .api
            .request(reqwest::Method::GET, "/scoreboard")
            .query(&Self::query_params(&q));
        let resp: ScoreboardResponse = self.api.send_json(req).await.map_err(normalize)?;
        check_response(&q, &resp)?;
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::types::{ScoreTab, ScoreboardTotals, SortOrder, Window};

    #[test]
    fn test_params_carry_resolved_defaults() {
        let q = ScoreboardQuery::new(ScoreTab::Retention).resolve();
        let params = HttpScoreService::query_params(&q);
        assert_eq!(params[0], ("tab", "retention".to_string()));
        assert_eq!(params[1], ("limit", "7".to_string()));
        assert_eq!(params[2], ("sort", "monthly".to_string()));
        assert_eq!(params[3], ("order", "desc".to_string()));

        let q = ScoreboardQuery::new(ScoreTab::Sales)
            .with_sort(Window::Daily)
            .with_order(SortOrder::Asc)
            .with_limit(3)
            .resolve();
        let params = HttpScoreService::query_params(&q);
        assert_eq!(params[1].1, "3");
        assert_eq!(params[2].1, "daily");
        assert_eq!(params[3].1, "asc");
    }

    #[test]
    fn test_mismatched_tab_is_malformed() {
        let q = ScoreboardQuery::new(ScoreTab::Sales).resolve();
        let resp = ScoreboardResponse {
            tab: ScoreTab::Retention,
            rows: Vec::new(),
            totals: ScoreboardTotals::default(),
        };
        let err = check_response(&q, &resp).unwrap_err();
        assert_eq!(err.to_string(), "Scoreboard response malformed");
    }

    #[test]
    fn test_status_failures_are_normalized() {
        let err = normalize(ApiFailure::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: None,
        });
        assert_eq!(err.to_string(), "Scoreboard HTTP 502");
        let err = normalize(ApiFailure::Decode("expected value".into()));
        assert_eq!(err.to_string(), "Scoreboard fetch failed");
    }
}
