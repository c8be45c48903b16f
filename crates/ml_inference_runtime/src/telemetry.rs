use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `DEBUG=LOGTYPE` switches the default filter from `info` to `debug`.
pub const DEBUG_SENTINEL: &str = "LOGTYPE";

pub fn debug_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.trim() == DEBUG_SENTINEL)
}

pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Installs the JSON subscriber; `RUST_LOG` overrides the default level.
pub fn init_tracing(debug: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|error| format!("failed to install tracing subscriber: {error}"))
}

/// Same as [`init_tracing`] with the level taken from the `DEBUG` variable.
pub fn init_tracing_from_env() -> Result<(), String> {
    let debug = std::env::var(crate::config::DEBUG_ENV).ok();
    init_tracing(debug_enabled(debug.as_deref()))
}
