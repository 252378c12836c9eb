//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTFOLIO_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `PORTFOLIO_BASE_URL` - Public URL of the site
//! - `PORTFOLIO_ADMIN_USERNAME` - Admin login name
//! - `PORTFOLIO_ADMIN_PASSWORD` - Admin password (high entropy, not a placeholder)
//!
//! ## Optional
//! - `PORTFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTFOLIO_PORT` - Listen port (default: 3000)
//! - `PORTFOLIO_UTC_OFFSET` - Clock used for automatic theme, e.g. `-05:00` (default: +00:00)
//! - `PORTFOLIO_THEME_REFRESH_SECONDS` - Client re-check interval in automatic mode (default: 60)
//! - `PORTFOLIO_CONTENT_DIR` - Markdown/YAML content (default: crates/site/content)
//! - `PORTFOLIO_STATIC_DIR` - Static assets (default: crates/site/static)
//! - `PORTFOLIO_TRUST_PROXY_HEADERS` - Key rate limits on `CF-Connecting-IP`,
//!   `X-Real-IP`, `Fly-Client-IP` or `X-Forwarded-For` (default: false). Only
//!   enable behind a proxy that overwrites them.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use portfolio_core::AdminCredentials;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "admin123",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// The single admin credential pair
    pub admin: AdminCredentials,
    /// Theme clock and refresh settings
    pub theme: ThemeConfig,
    /// Directory holding `pages/*.md`, `skills.yaml` and `projects.yaml`
    pub content_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Whether rate limits read the client address from proxy headers
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Automatic theme settings.
#[derive(Debug, Clone, Copy)]
pub struct ThemeConfig {
    /// Offset of the clock that decides light vs dark
    pub utc_offset: FixedOffset,
    /// How often the browser re-checks the mode while automatic
    pub refresh_seconds: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            refresh_seconds: 60,
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the admin password fails validation (placeholder detection, length,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PORTFOLIO_DATABASE_URL")?;
        let host = parse_env("PORTFOLIO_HOST", "127.0.0.1")?;
        let port = parse_env("PORTFOLIO_PORT", "3000")?;
        let base_url = get_required_env("PORTFOLIO_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("PORTFOLIO_BASE_URL".to_string(), e.to_string())
        })?;

        let admin = load_admin_credentials()?;
        let theme = ThemeConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin,
            theme,
            content_dir: get_env_or_default("PORTFOLIO_CONTENT_DIR", "crates/site/content").into(),
            static_dir: get_env_or_default("PORTFOLIO_STATIC_DIR", "crates/site/static").into(),
            trust_proxy_headers: parse_env("PORTFOLIO_TRUST_PROXY_HEADERS", "false")?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ThemeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("PORTFOLIO_UTC_OFFSET", "+00:00");
        let utc_offset = parse_utc_offset(&raw).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "PORTFOLIO_UTC_OFFSET".to_string(),
                format!("expected +HH:MM or -HH:MM, got '{raw}'"),
            )
        })?;
        let refresh_seconds: u32 = parse_env("PORTFOLIO_THEME_REFRESH_SECONDS", "60")?;
        if refresh_seconds == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PORTFOLIO_THEME_REFRESH_SECONDS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            utc_offset,
            refresh_seconds,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse `+HH:MM` / `-HH:MM` (or `Z`) into a fixed offset.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Load and validate the admin credential pair.
fn load_admin_credentials() -> Result<AdminCredentials, ConfigError> {
    let username = get_required_env("PORTFOLIO_ADMIN_USERNAME")?;
    let password = get_required_env("PORTFOLIO_ADMIN_PASSWORD")?;
    validate_secret_strength(&password, "PORTFOLIO_ADMIN_PASSWORD")?;

    AdminCredentials::new(username.trim(), SecretString::from(password)).map_err(|e| {
        ConfigError::InvalidEnvVar("PORTFOLIO_ADMIN_USERNAME".to_string(), e.to_string())
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is long enough, not a placeholder, and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters"),
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated password."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_edges() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_rejects_placeholders() {
        let err = validate_secret_strength("changeme-please-42", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
        assert!(validate_secret_strength("MyPassword!2024x", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_rejects_short_and_low_entropy() {
        assert!(validate_secret_strength("aB3$xY9", "TEST_VAR").is_err());
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaa", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_accepts_random() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+00:00").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("-05:00").unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(
            parse_utc_offset("+05:30").unwrap().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert!(parse_utc_offset("05:00").is_none());
        assert!(parse_utc_offset("+25:00").is_none());
        assert!(parse_utc_offset("+05:75").is_none());
        assert!(parse_utc_offset("").is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = SiteConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            admin: AdminCredentials::new("aj", SecretString::from("aB3$xY9!mK2@nL5#")).unwrap(),
            theme: ThemeConfig::default(),
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_https());
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let admin = AdminCredentials::new("aj", SecretString::from("aB3$xY9!mK2@nL5#")).unwrap();
        let debug = format!("{admin:?}");
        assert!(debug.contains("aj"));
        assert!(!debug.contains("aB3$xY9!mK2@nL5#"));
    }
}
