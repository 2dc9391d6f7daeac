// Configuration module entry point
// Loads layered configuration once at startup and validates the upstream section

mod state;
mod types;

use std::fmt;
use std::net::SocketAddr;

use crate::logger::Level;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Environment variable holding the upstream base URL
pub const PETSTORE_URL_ENV: &str = "PETSTORE_URL";
/// Environment variable holding the upstream bearer token
pub const PETSTORE_TOKEN_ENV: &str = "PETSTORE_ACCESS_TOKEN";

/// Errors raised while loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Source could not be read or deserialized
    Load(config::ConfigError),
    /// `PETSTORE_URL` is unset or empty
    MissingPetstoreUrl,
    /// `PETSTORE_URL` is not an absolute http(s) URL
    InvalidPetstoreUrl { url: String, reason: String },
    /// Listen address does not parse
    InvalidAddress(String),
    /// `logging.level` names no known level
    InvalidLogLevel(String),
    /// Upstream HTTP client could not be constructed
    Client(reqwest::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "failed to load configuration: {e}"),
            Self::MissingPetstoreUrl => {
                write!(f, "{PETSTORE_URL_ENV} is not set (or petstore.url is empty)")
            }
            Self::InvalidPetstoreUrl { url, reason } => {
                write!(f, "invalid petstore URL '{url}': {reason}")
            }
            Self::InvalidAddress(msg) => write!(f, "{msg}"),
            Self::InvalidLogLevel(level) => write!(
                f,
                "invalid logging.level '{level}' (expected error, warn, info or debug)"
            ),
            Self::Client(e) => write!(f, "failed to build upstream HTTP client: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        Self::Load(e)
    }
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        Self::build(
            config_path,
            std::env::var(PETSTORE_URL_ENV).ok(),
            std::env::var(PETSTORE_TOKEN_ENV).ok(),
        )
    }

    /// Build configuration from a file plus explicit upstream overrides
    ///
    /// Layering, lowest first: defaults, config file, `PETWEB__*` environment,
    /// then the `PETSTORE_*` overrides passed in.
    pub fn build(
        config_path: &str,
        petstore_url: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let petstore_url = petstore_url.filter(|u| !u.trim().is_empty());
        let access_token = access_token.filter(|t| !t.trim().is_empty());

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4567)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "petstore-web/0.1")?
            .set_default("petstore.timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PETWEB")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("petstore.url", petstore_url)?
            .set_override_option("petstore.access_token", access_token)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that would produce malformed upstream requests
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.petstore_base_url()?;
        self.get_socket_addr()?;
        if Level::parse(&self.logging.level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }
        Ok(())
    }

    /// Resolved upstream base URL, always ending in `/`
    pub fn petstore_base_url(&self) -> Result<reqwest::Url, ConfigError> {
        let raw = self
            .petstore
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingPetstoreUrl)?;

        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        let url = reqwest::Url::parse(&normalized).map_err(|e| ConfigError::InvalidPetstoreUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidPetstoreUrl {
                    url: raw.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidPetstoreUrl {
                url: raw.to_string(),
                reason: "base URL must not carry a query or fragment".to_string(),
            });
        }

        Ok(url)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::InvalidAddress(format!("Invalid address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FILE: &str = "does-not-exist/petstore-web-test-config";

    fn build(url: Option<&str>, token: Option<&str>) -> Result<Config, ConfigError> {
        Config::build(NO_FILE, url.map(String::from), token.map(String::from))
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = build(Some("http://localhost:8080/v2/"), None).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 4567);
        assert_eq!(cfg.petstore.timeout, 30);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.health.enabled);
        assert!(cfg.petstore.access_token.is_none());
    }

    #[test]
    fn test_missing_url_rejected() {
        assert!(matches!(build(None, None), Err(ConfigError::MissingPetstoreUrl)));
        assert!(matches!(
            build(Some("   "), None),
            Err(ConfigError::MissingPetstoreUrl)
        ));
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(
            build(Some("not a url"), None),
            Err(ConfigError::InvalidPetstoreUrl { .. })
        ));
        assert!(matches!(
            build(Some("ftp://petstore.example.com/"), None),
            Err(ConfigError::InvalidPetstoreUrl { .. })
        ));
        assert!(matches!(
            build(Some("http://petstore.example.com/v2/?x=1"), None),
            Err(ConfigError::InvalidPetstoreUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let cfg = build(Some("https://petstore.example.com/v2"), None).unwrap();
        let base = cfg.petstore_base_url().unwrap();
        assert_eq!(base.as_str(), "https://petstore.example.com/v2/");
    }

    #[test]
    fn test_empty_token_treated_as_absent() {
        let cfg = build(Some("http://localhost/"), Some("")).unwrap();
        assert!(cfg.petstore.access_token.is_none());

        let cfg = build(Some("http://localhost/"), Some("secret")).unwrap();
        assert_eq!(cfg.petstore.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let cfg = build(Some("http://localhost/"), Some("secret")).unwrap();
        let dbg = format!("{:?}", cfg.petstore);
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn test_log_level_validated() {
        let mut cfg = build(Some("http://localhost/"), None).unwrap();
        cfg.logging.level = "WARN".to_string();
        assert!(cfg.validate().is_ok());

        cfg.logging.level = "loud".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }
}
