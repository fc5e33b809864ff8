//! Configuration management for broadcast-mailer
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `MAILER_` prefix, `__` for nesting)
//! 2. An explicit file passed with `--config`
//! 3. `./config.toml` (development)
//! 4. `~/.config/broadcast-mailer/config.toml` (user config, XDG)
//! 5. `/etc/broadcast-mailer/config.toml` (system config)
//! 6. Hardcoded defaults (fallback)
//!
//! Environment variable format: `MAILER_SECTION__FIELD_NAME`
//! - Use `__` (double underscore) to separate nested sections
//! - Use `_` (single underscore) within field names
//! - Example: `MAILER_DISPATCH__ENDPOINT=https://app.example.com/api/send-email`
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [event_store]
//! backend = "postgres"
//! database_url = "postgres://localhost/app"
//! collection = "events"
//!
//! [dispatch]
//! backend = "http"
//! endpoint = "http://127.0.0.1:3000/api/send-email"
//!
//! [logging]
//! json = false
//! filter = "info,broadcast_mailer=debug"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use broadcast_mailer::config::MailerConfig;
//!
//! let config = MailerConfig::default();
//! assert_eq!(config.server.port, 8080);
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::events::EventRecord;

/// Directory name used for system and user config paths
const APP_DIR: &str = "broadcast-mailer";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Event store backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStoreBackend {
    /// `PostgreSQL` document table
    #[default]
    Postgres,
    /// Records listed in this configuration
    Memory,
}

/// Event store settings
///
/// # Example Configuration
///
/// ```toml
/// [event_store]
/// backend = "memory"
///
/// [[event_store.records]]
/// id = "0001"
/// Name = "Dance Competition"
///
/// [[event_store.records]]
/// id = "0002"
/// name = "Hackathon"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventStoreSettings {
    /// Which backend serves events
    pub backend: EventStoreBackend,

    /// Database connection URL (postgres backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Table holding event documents (postgres backend)
    pub collection: String,

    /// Event documents (memory backend)
    pub records: Vec<EventRecord>,
}

impl Default for EventStoreSettings {
    fn default() -> Self {
        Self {
            backend: EventStoreBackend::default(),
            database_url: None,
            collection: "events".to_string(),
            records: Vec::new(),
        }
    }
}

/// Mail dispatch backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchBackend {
    /// JSON POST to the mail dispatch endpoint
    #[default]
    Http,
    /// Log broadcasts instead of sending them
    Console,
}

/// Mail dispatch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Which backend handles broadcasts
    pub backend: DispatchBackend,

    /// Endpoint broadcasts are posted to (http backend)
    pub endpoint: String,

    /// Log message bodies (console backend)
    pub verbose: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            backend: DispatchBackend::default(),
            endpoint: "http://127.0.0.1:3000/api/send-email".to_string(),
            verbose: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of pretty output
    pub json: bool,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            json: !cfg!(debug_assertions),
            filter: None,
        }
    }
}

/// Complete broadcast-mailer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailerConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Event store settings
    #[serde(default)]
    pub event_store: EventStoreSettings,

    /// Mail dispatch settings
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl MailerConfig {
    /// Load configuration from the standard locations
    ///
    /// Searches, from lowest to highest priority: defaults,
    /// `/etc/broadcast-mailer/config.toml`, the user config path,
    /// `./config.toml`, `explicit` (when given), then `MAILER_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use broadcast_mailer::config::MailerConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = MailerConfig::load(None)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        let config = figment.merge(Self::env()).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/broadcast-mailer/config.toml` on Linux.
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join(APP_DIR).join("config.toml"),
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn env() -> Env {
        Env::prefixed("MAILER_").split("__").lowercase(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MailerConfig::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.event_store.backend, EventStoreBackend::Postgres);
        assert_eq!(config.event_store.collection, "events");
        assert_eq!(config.dispatch.backend, DispatchBackend::Http);
        assert_eq!(
            config.dispatch.endpoint,
            "http://127.0.0.1:3000/api/send-email"
        );
    }

    #[test]
    fn test_defaults_round_trip_through_figment() {
        let config: MailerConfig = MailerConfig::defaults().unwrap().extract().unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.event_store.records.is_empty());
    }

    #[test]
    fn test_recommended_path() {
        let path = MailerConfig::recommended_path();
        let path = path.to_str().unwrap();
        assert!(path.ends_with("config.toml"));
        assert!(path.contains("broadcast-mailer") || path == "./config.toml");
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = MailerConfig::load_from("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.event_store.collection, "events");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
port = 9090

[event_store]
backend = "memory"

[[event_store.records]]
id = "0001"
Name = "Dance Competition"

[[event_store.records]]
id = "0002"

[dispatch]
backend = "console"
verbose = true
"#,
        )
        .unwrap();

        let config = MailerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.event_store.backend, EventStoreBackend::Memory);
        assert_eq!(config.event_store.records.len(), 2);
        assert_eq!(
            config.event_store.records[0].display_name().as_deref(),
            Some("Dance Competition")
        );
        assert_eq!(config.event_store.records[1].display_name(), None);
        assert_eq!(config.dispatch.backend, DispatchBackend::Console);
        assert!(config.dispatch.verbose);
    }

    #[test]
    fn test_load_with_missing_explicit_file_fails() {
        let result = MailerConfig::load(Some(Path::new("/nonexistent/mailer.toml")));
        assert!(result.is_err());
    }
}
