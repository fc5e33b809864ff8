//! Observability (logging, tracing)
//!
//! Structured logging through `tracing`, with pretty output for development
//! and JSON lines for production.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Filter used when neither `RUST_LOG` nor the config sets one
fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,broadcast_mailer=trace,sqlx=warn"
    } else {
        "info"
    }
}

/// Build the log filter
///
/// `RUST_LOG` wins over the configured filter, which wins over the
/// build-profile default. An unparsable configured filter falls back to the
/// default.
#[must_use]
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        settings
            .filter
            .as_deref()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(default_filter()))
    })
}

/// Initialize the logging stack
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
///
/// # Example
///
/// ```rust,no_run
/// use broadcast_mailer::{config::LoggingSettings, observability};
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&LoggingSettings::default())?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(settings));

    if settings.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_filter_used() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings {
            json: false,
            filter: Some("warn".to_string()),
        };
        assert_eq!(
            env_filter(&settings).to_string(),
            EnvFilter::new("warn").to_string()
        );
    }

    #[test]
    fn test_invalid_filter_falls_back_to_default() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings {
            json: false,
            filter: Some("broadcast_mailer=loudest".to_string()),
        };
        assert_eq!(
            env_filter(&settings).to_string(),
            EnvFilter::new(default_filter()).to_string()
        );
    }
}
