//! HTTP backends against a stub REST server on an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use app_lib::auth::types::LoginInput;
use app_lib::config::AppConfig;
use app_lib::error::{AppError, AuthErrorCode};
use app_lib::groups::types::UpsertGroupInput;
use app_lib::scoreboard::types::{AgentId, ScoreTab, ScoreboardQuery, SortOrder, Window};
use app_lib::AppServices;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

type Params = HashMap<String, String>;

async fn serve(app: Router) -> AppServices {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = AppConfig {
        api_base_url: Some(Url::parse(&format!("http://{addr}")).unwrap()),
        use_mock: false,
        ..AppConfig::default()
    };
    let services = AppServices::from_config(&config).unwrap();
    assert_eq!(services.scores.backend_name(), "remote");
    services
}

fn row(id: i64, monthly: f64) -> Value {
    json!({
        "agentId": id,
        "agentName": format!("Agent {id}"),
        "counts": { "daily": 1, "weekly": 5, "monthly": 20 },
        "revenue": { "daily": 10.0, "weekly": 50.0, "monthly": monthly },
        "goal": null
    })
}

// ── Scoreboard ──────────────────────────────────────────────────

#[tokio::test]
async fn test_scoreboard_sends_resolved_defaults() {
    let seen: Arc<Mutex<Option<Params>>> = Arc::default();
    let app = Router::new().route(
        "/scoreboard",
        get({
            let seen = seen.clone();
            move |Query(params): Query<Params>| {
                let seen = seen.clone();
                async move {
                    let tab = params.get("tab").cloned().unwrap_or_default();
                    *seen.lock().unwrap() = Some(params);
                    Json(json!({
                        "tab": tab,
                        "rows": [row(3, 900.0), row(1, 400.0)],
                        "totals": {
                            "counts": { "daily": 2, "weekly": 10, "monthly": 40 },
                            "revenue": { "daily": 20.0, "weekly": 100.0, "monthly": 1300.0 },
                            "goal": null
                        }
                    }))
                }
            }
        }),
    );
    let services = serve(app).await;

    let resp = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Retention))
        .await
        .unwrap();
    assert_eq!(resp.tab, ScoreTab::Retention);
    assert_eq!(resp.rows.len(), 2);
    assert_eq!(resp.rows[0].agent_id, AgentId::Number(3));
    assert_eq!(resp.totals.revenue.monthly, 1300.0);
    assert_eq!(resp.totals.goal, None);

    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params["tab"], "retention");
    assert_eq!(params["limit"], "7");
    assert_eq!(params["sort"], "monthly");
    assert_eq!(params["order"], "desc");
}

#[tokio::test]
async fn test_scoreboard_passes_explicit_params() {
    let seen: Arc<Mutex<Option<Params>>> = Arc::default();
    let app = Router::new().route(
        "/scoreboard",
        get({
            let seen = seen.clone();
            move |Query(params): Query<Params>| {
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = Some(params);
                    Json(json!({ "tab": "sales", "rows": [], "totals": {} }))
                }
            }
        }),
    );
    let services = serve(app).await;

    let query = ScoreboardQuery::new(ScoreTab::Sales)
        .with_limit(3)
        .with_sort(Window::Daily)
        .with_order(SortOrder::Asc);
    let resp = services.scores.get_scoreboard(&query).await.unwrap();
    assert!(resp.rows.is_empty());

    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params["limit"], "3");
    assert_eq!(params["sort"], "daily");
    assert_eq!(params["order"], "asc");
}

#[tokio::test]
async fn test_scoreboard_server_error_is_normalized() {
    let app = Router::new().route(
        "/scoreboard",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let services = serve(app).await;

    let err = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Sales))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert_eq!(err.to_string(), "Scoreboard HTTP 500");
}

#[tokio::test]
async fn test_scoreboard_undecodable_body() {
    let app = Router::new().route(
        "/scoreboard",
        get(|| async { Json(json!({ "tab": "sales", "rows": "nope" })) }),
    );
    let services = serve(app).await;

    let err = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Sales))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Scoreboard fetch failed");
}

#[tokio::test]
async fn test_scoreboard_wrong_tab_rejected() {
    let app = Router::new().route(
        "/scoreboard",
        get(|| async { Json(json!({ "tab": "sales", "rows": [], "totals": {} })) }),
    );
    let services = serve(app).await;

    let err = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Retention))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Scoreboard response malformed");
}

#[tokio::test]
async fn test_scoreboard_too_many_rows_rejected() {
    let app = Router::new().route(
        "/scoreboard",
        get(|| async {
            Json(json!({
                "tab": "sales",
                "rows": [row(1, 1.0), row(2, 2.0)],
                "totals": {}
            }))
        }),
    );
    let services = serve(app).await;

    let err = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Sales).with_limit(1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Scoreboard response malformed");
}

#[tokio::test]
async fn test_scoreboard_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = AppConfig {
        api_base_url: Some(Url::parse(&format!("http://{addr}")).unwrap()),
        use_mock: false,
        ..AppConfig::default()
    };
    let services = AppServices::from_config(&config).unwrap();
    let err = services
        .scores
        .get_scoreboard(&ScoreboardQuery::new(ScoreTab::Sales))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Scoreboard fetch failed");
}

// ── Auth ────────────────────────────────────────────────────────

fn login_router(status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/auth/login",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    )
}

#[tokio::test]
async fn test_login_success() {
    let app = Router::new().route(
        "/auth/login",
        post(|Json(input): Json<Value>| async move {
            assert_eq!(input["login"], "ava");
            assert_eq!(input["code2fa"], "123456");
            Json(json!({ "userId": "u-1", "token": "t-1" }))
        }),
    );
    let services = serve(app).await;

    let ok = services
        .auth
        .login(&LoginInput::new("ava", "pw").with_code("123456"))
        .await
        .unwrap();
    assert_eq!(ok.user_id, "u-1");
    assert_eq!(ok.token, "t-1");
}

#[tokio::test]
async fn test_login_failure_codes() {
    let cases = [
        (StatusCode::UNAUTHORIZED, json!({}), AuthErrorCode::InvalidCredentials),
        (StatusCode::CONFLICT, json!({}), AuthErrorCode::TwofaRequired),
        (
            StatusCode::BAD_REQUEST,
            json!({ "code": "TWOFA_REQUIRED" }),
            AuthErrorCode::TwofaRequired,
        ),
        (
            StatusCode::FORBIDDEN,
            json!({ "code": "INVALID_CREDENTIALS" }),
            AuthErrorCode::InvalidCredentials,
        ),
        (StatusCode::SERVICE_UNAVAILABLE, json!({}), AuthErrorCode::Network),
    ];

    for (status, body, expected) in cases {
        let services = serve(login_router(status, body)).await;
        let err = services
            .auth
            .login(&LoginInput::new("ava", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.auth_code(), Some(expected), "status {status}");
        if expected == AuthErrorCode::Network {
            assert_eq!(err.to_string(), "Login failed: 503");
        }
    }
}

#[tokio::test]
async fn test_two_fa_check() {
    let app = Router::new().route(
        "/auth/2fa-required",
        get(|Query(params): Query<Params>| async move {
            let login = params.get("login").cloned().unwrap_or_default();
            Json(json!({ "required": login == "admin" }))
        }),
    );
    let services = serve(app).await;

    assert!(services.auth.check_two_fa("admin").await.unwrap().required);
    assert!(!services.auth.check_two_fa("ava").await.unwrap().required);
}

#[tokio::test]
async fn test_two_fa_check_failure() {
    let app = Router::new().route(
        "/auth/2fa-required",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let services = serve(app).await;

    let err = services.auth.check_two_fa("ava").await.unwrap_err();
    assert_eq!(err.auth_code(), Some(AuthErrorCode::Network));
    assert_eq!(err.to_string(), "Auth check failed: 502");
}

// ── Groups ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_groups_round_trip() {
    let deleted: Arc<Mutex<Vec<String>>> = Arc::default();
    let app = Router::new()
        .route(
            "/groups",
            get(|Query(params): Query<Params>| async move {
                let tab = params.get("tab").cloned();
                Json(json!([{
                    "id": "g1",
                    "name": "Closers",
                    "memberAgentIds": ["1", 2],
                    "tab": tab
                }]))
            })
            .post(|Json(mut input): Json<Value>| async move {
                input["id"] = json!("g_new");
                input["createdAt"] = json!("2026-01-01T00:00:00Z");
                (StatusCode::CREATED, Json(input))
            }),
        )
        .route(
            "/groups/{id}",
            delete({
                let deleted = deleted.clone();
                move |Path(id): Path<String>| {
                    let deleted = deleted.clone();
                    async move {
                        if id == "missing" {
                            return StatusCode::NOT_FOUND.into_response();
                        }
                        deleted.lock().unwrap().push(id);
                        StatusCode::NO_CONTENT.into_response()
                    }
                }
            }),
        );
    let services = serve(app).await;

    let sales = services.groups.list(Some(ScoreTab::Sales)).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].tab, Some(ScoreTab::Sales));
    let all = services.groups.list(None).await.unwrap();
    assert_eq!(all[0].tab, None);

    let created = services
        .groups
        .create(&UpsertGroupInput {
            name: "Night shift".into(),
            member_agent_ids: vec![AgentId::Number(4)],
            tab: Some(ScoreTab::Retention),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "g_new");
    assert_eq!(created.member_agent_ids, vec![AgentId::Number(4)]);
    assert_eq!(created.tab, Some(ScoreTab::Retention));

    services.groups.remove("g 1").await.unwrap();
    assert_eq!(*deleted.lock().unwrap(), vec!["g 1".to_string()]);

    let err = services.groups.remove("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Group delete 404");
}

#[tokio::test]
async fn test_groups_reject_bad_input_before_sending() {
    let services = serve(Router::new()).await;

    let err = services.groups.remove("a/b").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = services
        .groups
        .create(&UpsertGroupInput {
            name: " ".into(),
            member_agent_ids: vec![],
            tab: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
