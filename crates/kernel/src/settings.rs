use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKLENS_ENV";
const CONFIG_DIR_ENV: &str = "BOOKLENS_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKLENS";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit directory and environment name.
    pub fn load_from(config_dir: &std::path::Path, environment: &str) -> anyhow::Result<Self> {
        let parsed: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        if settings.upstream.max_extra_pages > UpstreamSettings::EXTRA_PAGES_LIMIT {
            tracing::warn!(
                configured = settings.upstream.max_extra_pages,
                limit = UpstreamSettings::EXTRA_PAGES_LIMIT,
                "upstream.max_extra_pages clamped"
            );
            settings.upstream.max_extra_pages = UpstreamSettings::EXTRA_PAGES_LIMIT;
        }

        settings.environment = parsed;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Settings for the Google Books volumes endpoint and the page fan-out.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "UpstreamSettings::default_base_url")]
    pub base_url: String,
    /// Upper bound for a single page fetch.
    #[serde(default = "UpstreamSettings::default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Largest `extraPages` value accepted from callers.
    #[serde(default = "UpstreamSettings::default_max_extra_pages")]
    pub max_extra_pages: u32,
    /// Optional `langRestrict` code folded into every search term.
    #[serde(default)]
    pub language: Option<String>,
    /// Serve recorded upstream responses from this directory instead of the network.
    #[serde(default)]
    pub fixture_dir: Option<PathBuf>,
}

impl UpstreamSettings {
    /// Ceiling applied to `max_extra_pages` at load time.
    pub const EXTRA_PAGES_LIMIT: u32 = 40;

    fn default_base_url() -> String {
        "https://www.googleapis.com/books/v1/volumes".to_string()
    }

    fn default_fetch_timeout_ms() -> u64 {
        10000
    }

    fn default_max_extra_pages() -> u32 {
        4
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            fetch_timeout_ms: Self::default_fetch_timeout_ms(),
            max_extra_pages: Self::default_max_extra_pages(),
            language: None,
            fixture_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_upstream_points_at_google_books() {
        let settings = Settings::default();
        assert_eq!(
            settings.upstream.base_url,
            "https://www.googleapis.com/books/v1/volumes"
        );
        assert_eq!(settings.upstream.max_extra_pages, 4);
        assert!(settings.upstream.fixture_dir.is_none());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn oversized_fan_out_limit_is_clamped() {
        let dir = std::env::temp_dir().join("booklens-settings-clamp");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("base.toml"),
            "[upstream]\nmax_extra_pages = 4294967295\n",
        )
        .unwrap();

        let settings = Settings::load_from(&dir, "local").unwrap();
        assert_eq!(
            settings.upstream.max_extra_pages,
            UpstreamSettings::EXTRA_PAGES_LIMIT
        );
    }

    #[test]
    fn missing_config_files_fall_back_to_defaults() {
        let dir = std::env::temp_dir().join("booklens-settings-missing");
        let settings = Settings::load_from(&dir, "staging").unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }
}
