use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins when set; otherwise the
/// service's own crate logs at debug and everything else at info.
/// `PAWS_ENV=production` switches to JSON lines for the log shipper.
pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let service_target = service_name.replace('-', "_");
        EnvFilter::new(format!("info,{service_target}=debug,tower_http=debug"))
    });

    let is_production = std::env::var("PAWS_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if is_production {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }

    tracing::info!(service = service_name, "tracing initialized");
}
