//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL of the content service
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `ADMIN_PASSWORD` - Shared admin password (min 12 chars, not a placeholder)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `CONTENT_FILE` - Flat-file content document (default: data/content.json)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (media uploads)
//! - `MEDIA_BACKEND` - `local` (default) or `supabase`
//! - `MEDIA_DIR` - Upload directory for the local backend (default: media)
//! - `SUPABASE_URL` - Project URL (required for `supabase`)
//! - `SUPABASE_SERVICE_KEY` - Service role key (required for `supabase`)
//! - `SUPABASE_BUCKET` - Storage bucket (default: site-media)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_CONTENT_FILE: &str = "data/content.json";
const DEFAULT_MEDIA_DIR: &str = "media";
const DEFAULT_SUPABASE_BUCKET: &str = "site-media";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the service
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Shared admin password
    pub admin_password: SecretString,
    /// Path of the flat-file content document
    pub content_file: PathBuf,
    /// Where uploaded media goes
    pub media: MediaConfig,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Media upload backend.
#[derive(Debug, Clone)]
pub enum MediaConfig {
    /// Files written under a local directory and served at `/media`.
    Local { dir: PathBuf },
    /// Supabase object storage.
    Supabase(SupabaseConfig),
}

/// Supabase storage configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., <https://abc.supabase.co>)
    pub url: String,
    /// Service role key (bypasses row-level security)
    pub service_key: SecretString,
    /// Bucket that receives uploads
    pub bucket: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl MediaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        match get_env_or_default("MEDIA_BACKEND", "local").as_str() {
            "local" => Ok(Self::Local {
                dir: PathBuf::from(get_env_or_default("MEDIA_DIR", DEFAULT_MEDIA_DIR)),
            }),
            "supabase" => {
                let url = get_required_env("SUPABASE_URL")?;
                url::Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string())
                })?;
                Ok(Self::Supabase(SupabaseConfig {
                    url: url.trim_end_matches('/').to_string(),
                    service_key: get_validated_secret("SUPABASE_SERVICE_KEY")?,
                    bucket: get_env_or_default("SUPABASE_BUCKET", DEFAULT_SUPABASE_BUCKET),
                }))
            }
            other => Err(ConfigError::InvalidEnvVar(
                "MEDIA_BACKEND".to_string(),
                format!("expected 'local' or 'supabase', got '{other}'"),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        let session_secret = get_validated_secret("ADMIN_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;
        let admin_password = SecretString::from(get_required_env("ADMIN_PASSWORD")?);
        validate_admin_password(&admin_password, "ADMIN_PASSWORD")?;

        let content_file = PathBuf::from(get_env_or_default("CONTENT_FILE", DEFAULT_CONTENT_FILE));
        let media = MediaConfig::from_env()?;
        let log_json = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            admin_password,
            content_file,
            media,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
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
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Validate the shared admin password.
///
/// Humans type this one, so there is no entropy floor; only length and the
/// placeholder blocklist apply.
fn validate_admin_password(password: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = password.expose_secret();
    if value.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters"),
        ));
    }
    check_placeholder(value, var_name)
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
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn check_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    check_placeholder(secret, var_name)?;

    // Real secrets like API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/agency"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            admin_password: SecretString::from("correct horse battery staple"),
            content_file: PathBuf::from(DEFAULT_CONTENT_FILE),
            media: MediaConfig::Local {
                dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-session-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(33), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_admin_password_rules() {
        let short = SecretString::from("hunter2");
        assert!(validate_admin_password(&short, "ADMIN_PASSWORD").is_err());

        let placeholder = SecretString::from("changeme-changeme");
        assert!(validate_admin_password(&placeholder, "ADMIN_PASSWORD").is_err());

        let phrase = SecretString::from("correct horse battery staple");
        assert!(validate_admin_password(&phrase, "ADMIN_PASSWORD").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3001").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        assert!(!config("http://localhost:3001").is_secure());
        assert!(config("https://admin.studio.test").is_secure());
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let mut config = config("http://localhost:3001");
        config.media = MediaConfig::Supabase(SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            service_key: SecretString::from("sb-service-key-value"),
            bucket: DEFAULT_SUPABASE_BUCKET.to_string(),
        });

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://abc.supabase.co"));
        assert!(debug_output.contains("site-media"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sb-service-key-value"));
        assert!(!debug_output.contains("correct horse battery staple"));
    }
}
