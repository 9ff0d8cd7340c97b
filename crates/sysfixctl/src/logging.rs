//! Logging setup for sysfixctl
//!
//! Logs go to stderr so they never mix with report output.
//! Filter priority: `$SYSFIX_LOG`, then `--verbose`, then config `log.level`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "SYSFIX_LOG";

/// Pick the filter directive to use
pub fn filter_directive(env_value: Option<&str>, verbose: bool, config_level: &str) -> String {
    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_string();
    }
    if verbose {
        return "debug".to_string();
    }
    match config_level.trim().to_lowercase().as_str() {
        level @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => level.to_string(),
        _ => "warn".to_string(),
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(verbose: bool, config_level: &str) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose, config_level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
