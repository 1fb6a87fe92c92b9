fn main() {
    // Initialize Sentry before anything else so startup panics are captured.
    // Returns a no-op guard when SENTRY_DSN is absent.
    let _sentry_guard = sentry::init(sentry_options());

    if let Err(e) = app_lib::run() {
        tracing::error!(error = %e, "Dashboard failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn sentry_options() -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: option_env!("SENTRY_DSN").and_then(|s| s.parse().ok()),
        release: Some(env!("CARGO_PKG_VERSION").into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        before_send: Some(std::sync::Arc::new(|mut event| {
            if let Some(ref mut user) = event.user {
                user.email = None;
                user.ip_address = None;
                user.username = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
