//! Tracing subscriber setup.
//!
//! Debug mode logs human-readable lines with source locations; otherwise logs are
//! JSON lines and framework targets are limited to errors. `RUST_LOG` overrides the
//! default filter in both modes.

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppSettings;

/// Crates whose chatter is only interesting when debugging
const FRAMEWORK_TARGETS: &[&str] = &["sqlx", "hyper", "tower_http", "axum"];

/// Default filter directives for the given mode
pub fn default_directives(is_debug: bool) -> String {
    let (level, framework_level) = if is_debug { ("debug", "info") } else { ("info", "error") };
    let mut directives = vec![level.to_string()];
    directives.extend(
        FRAMEWORK_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, framework_level)),
    );
    directives.join(",")
}

/// Install the global subscriber. Call once, from the binary.
pub fn init_tracing(settings: &AppSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(settings.is_debug)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if settings.is_debug {
        builder.with_file(true).with_line_number(true).try_init()
    } else {
        builder.json().with_current_span(true).try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    info!(
        service = %settings.title,
        version = %settings.version,
        debug = settings.is_debug,
        "Logging initialised"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_directives_quiet_frameworks() {
        let directives = default_directives(false);
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("sqlx=error"));
        assert!(directives.contains("tower_http=error"));
    }

    #[test]
    fn test_debug_directives() {
        let directives = default_directives(true);
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper=info"));
    }

    #[test]
    fn test_directives_parse() {
        for is_debug in [true, false] {
            assert!(EnvFilter::try_new(default_directives(is_debug)).is_ok());
        }
    }
}
