//! Server configuration

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "<redacted>";

/// Upstream storefront connection
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Storefront base URL; sync is disabled when unset
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub consumer_key: String,

    #[serde(default)]
    pub consumer_secret: String,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &REDACTED)
            .field("consumer_secret", &REDACTED)
            .finish()
    }
}

/// Server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Catalog database URL; the in-memory store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Seconds between scheduled sync runs
    pub sync_interval_secs: u64,

    /// Log level
    pub log_level: String,

    /// `text` or `json`
    pub log_format: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| REDACTED))
            .field("upstream", &self.upstream)
            .field("sync_interval_secs", &self.sync_interval_secs)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            database_url: None,
            upstream: UpstreamConfig::default(),
            sync_interval_secs: 3600,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, `config/server.*`, `SHOPSEG_*` variables and
    /// the conventional unprefixed variables, later sources winning.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        Self::from_sources(
            config::File::with_name("config/server").required(false),
            |name| std::env::var(name).ok(),
        )
    }

    /// Build a configuration from one file source plus an environment lookup.
    pub fn from_sources<F>(file: F, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();

        let cfg = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("sync_interval_secs", i64::try_from(defaults.sync_interval_secs)?)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("SHOPSEG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("port", env("PORT"))?
            .set_override_option("database_url", env("DATABASE_URL"))?
            .set_override_option("upstream.base_url", env("WC_BASE_URL"))?
            .set_override_option("upstream.consumer_key", env("CONSUMER_KEY"))?
            .set_override_option("upstream.consumer_secret", env("CONSUMER_SECRET"))?
            .build()?;

        cfg.try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// Whether periodic sync should run
    pub fn sync_enabled(&self) -> bool {
        self.upstream
            .base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(file_contents: &str, vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_sources(
            config::File::from_str(file_contents, config::FileFormat::Toml),
            move |name| vars.get(name).cloned(),
        )
        .unwrap()
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.sync_interval_secs, 3600);
        assert_eq!(config.log_format, "text");
        assert!(config.database_url.is_none());
        assert!(!config.sync_enabled());
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with("", &[]);

        assert_eq!(config.port, 4000);
        assert_eq!(config.log_level, "info");
        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.upstream.consumer_key, "");
    }

    #[test]
    fn test_file_values() {
        let config = load_with(
            r#"
            port = 8080
            sync_interval_secs = 60

            [upstream]
            base_url = "https://shop.example.com"
            consumer_key = "ck_file"
            "#,
            &[],
        );

        assert_eq!(config.port, 8080);
        assert_eq!(config.sync_interval_secs, 60);
        assert_eq!(config.upstream.consumer_key, "ck_file");
        assert!(config.sync_enabled());
    }

    #[test]
    fn test_unprefixed_env_overrides_file() {
        let config = load_with(
            r#"
            port = 8080

            [upstream]
            base_url = "https://old.example.com"
            "#,
            &[
                ("PORT", "5005"),
                ("DATABASE_URL", "postgres://localhost/catalog"),
                ("WC_BASE_URL", "https://shop.example.com"),
                ("CONSUMER_KEY", "ck_env"),
                ("CONSUMER_SECRET", "cs_env"),
            ],
        );

        assert_eq!(config.port, 5005);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/catalog")
        );
        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("https://shop.example.com")
        );
        assert_eq!(config.upstream.consumer_key, "ck_env");
        assert_eq!(config.upstream.consumer_secret, "cs_env");
    }

    #[test]
    fn test_blank_base_url_disables_sync() {
        let mut config = ServerConfig::default();
        config.upstream.base_url = Some("  ".to_string());
        assert!(!config.sync_enabled());
    }

    #[test]
    fn test_debug_output_hides_credentials() {
        let config = load_with(
            "",
            &[
                ("DATABASE_URL", "postgres://catalog:hunter2@db/catalog"),
                ("WC_BASE_URL", "https://shop.example.com"),
                ("CONSUMER_KEY", "ck_live_123"),
                ("CONSUMER_SECRET", "cs_live_456"),
            ],
        );
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("ck_live_123"));
        assert!(!rendered.contains("cs_live_456"));
        assert!(rendered.contains("https://shop.example.com"));
        assert!(rendered.contains("<redacted>"));
        assert!(format!("{:?}", ServerConfig::default()).contains("database_url: None"));
    }
}
