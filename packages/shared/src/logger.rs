//! Logging setup utilities for the Undoubt binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is filtered at the default level.
const WORKSPACE_CRATES: [&str; 3] = ["undoubt_shared", "undoubt_server", "undoubt_client"];

/// Build the default filter directive when `RUST_LOG` is not set.
///
/// # Examples
///
/// ```
/// use undoubt_shared::logger::default_directive;
///
/// let directive = default_directive("undoubt-server", "info");
/// assert!(directive.contains("undoubt_server=info"));
/// ```
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut targets: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, default_log_level))
        .collect();

    let binary_target = binary_name.replace('-', "_");
    if !WORKSPACE_CRATES.contains(&binary_target.as_str()) {
        targets.push(format!("{}={}", binary_target, default_log_level));
    }

    targets.push(format!("tower_http={}", default_log_level));
    targets.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "undoubt-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
