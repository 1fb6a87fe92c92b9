pub mod auth;
pub mod config;
pub mod error;
pub mod groups;
pub mod http;
pub mod logging;
pub mod notifications;
pub mod scoreboard;
pub mod validation;

use std::sync::Arc;

use auth::AuthService;
use config::{AppConfig, Backend};
use error::AppError;
use groups::GroupService;
use scoreboard::types::{ScoreTab, ScoreboardQuery};
use scoreboard::ScoreService;

/// Every service the dashboard talks to, built once for a single backend.
#[derive(Clone)]
pub struct AppServices {
    pub backend: Backend,
    pub scores: Arc<dyn ScoreService>,
    pub groups: Arc<dyn GroupService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let backend = config.backend();
        Ok(Self {
            scores: scoreboard::create_score_service(&backend, config)?,
            groups: groups::create_group_service(&backend, config)?,
            auth: auth::create_auth_service(&backend, config)?,
            backend,
        })
    }
}

/// Queries to print: the positional `[tab] [sort] [order] [limit]` arguments,
/// or every tab with defaults when none are given.
fn queries_from_args(args: &[String]) -> Result<Vec<ScoreboardQuery>, AppError> {
    let Some(tab) = args.first() else {
        return Ok(ScoreTab::ALL.iter().map(|t| ScoreboardQuery::new(*t)).collect());
    };
    let arg = |i: usize| args.get(i).map(String::as_str);
    Ok(vec![ScoreboardQuery::from_params(tab, arg(1), arg(2), arg(3))?])
}

/// Entry point for the binary: print the requested leaderboards.
pub fn run() -> Result<(), AppError> {
    logging::init();

    tracing::info!("Starting scoreboard dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries = queries_from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(format!("failed to start runtime: {e}")))?;

    runtime.block_on(async {
        let services = AppServices::from_config(&config)?;
        tracing::info!(backend = services.backend.name(), "Services initialized");

        for query in &queries {
            let resolved = query.resolve();
            let resp = services.scores.get_scoreboard(query).await?;
            println!(
                "== {} (by {}, {}, top {}) ==",
                resp.tab, resolved.sort.as_str(), resolved.order.as_str(), resolved.limit
            );
            print!("{}", scoreboard::display::render_table(&resp));
        }
        Ok::<(), AppError>(())
    })
}
