//! Tracing subscriber setup for hosts embedding the runtime.

use tracing_subscriber::{EnvFilter, fmt};

/// Used when neither an explicit filter nor `RUST_LOG` parses.
pub const DEFAULT_FILTER: &str = "warn,lrt=info";

/// Install a stderr `fmt` subscriber. `filter` takes precedence over
/// `RUST_LOG`. Returns false if a global subscriber was already set.
pub fn init(filter: Option<&str>) -> bool {
    let filter_expr = filter
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok());

    let builder = fmt().with_writer(std::io::stderr);

    let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
        Some(filter) => builder.with_env_filter(filter),
        None => builder.with_env_filter(DEFAULT_FILTER),
    };

    builder.try_init().is_ok()
}
