//! Logging setup for the command line.
//!
//! Logs go to stderr so that reports printed on stdout stay parseable.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise info, or debug with `--verbose`.
fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
}

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!(
        "warn,healframe={level},healframe_core={level},healframe_reports={level}"
    ))
}

pub fn init_logging(verbose: bool) -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(build_env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(false).to_string().contains("healframe_core=info"));
        assert!(default_filter(true).to_string().contains("healframe_core=debug"));
    }
}
