use tracing::Level;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Registry};

pub fn level_from_str(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let level = level_from_str(&log_level);

    let filter = filter::Targets::new()
        .with_target(env!("CARGO_PKG_NAME"), level)
        .with_default(Level::WARN);

    let tracing_layer = tracing_subscriber::fmt::layer().with_target(false);

    Registry::default().with(tracing_layer).with(filter).init();
}
