use tracing_subscriber::EnvFilter;

use crate::error::ShellError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TETHER_LOG";

/// Level used when `TETHER_LOG` is unset.
pub fn default_level(quiet: bool, debug: bool) -> &'static str {
    match (quiet, debug) {
        (_, true) => "debug",
        (true, false) => "error",
        (false, false) => "warn",
    }
}

/// Installs the global subscriber. Logs go to stderr so they never mix
/// into the console transcript on stdout.
pub fn init(quiet: bool, debug: bool) -> Result<(), ShellError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(quiet, debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ShellError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), "warn");
        assert_eq!(default_level(true, false), "error");
        assert_eq!(default_level(false, true), "debug");
        assert_eq!(default_level(true, true), "debug");
    }
}
