use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,app_lib=debug";

/// Initialize tracing with a compact stdout layer and a Sentry layer.
///
/// - Sentry: ERROR events become issues, WARN events become breadcrumbs
/// - Default level: INFO (crate at DEBUG), override via RUST_LOG
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    // No-op when Sentry has no DSN.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(sentry_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
        tracing::info!("still alive");
    }
}
