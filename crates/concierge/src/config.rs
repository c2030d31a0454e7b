//! Concierge configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CONCIERGE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `CLAUDE_API_KEY` - Anthropic Claude API key
//!
//! ## Optional
//! - `CONCIERGE_HOST` - Bind address (default: 0.0.0.0)
//! - `CONCIERGE_PORT` - Listen port (default: 3000)
//! - `CONCIERGE_COMPANY_NAME` - Name the agent introduces itself for (default: Brew & Co.)
//! - `CLAUDE_MODEL` - Claude model ID (default: claude-sonnet-4-20250514)
//! - `AGENT_MAX_STEP_RETRIES` - Retries for a single model call (default: 2)
//! - `AGENT_MAX_TOTAL_RETRIES` - Retries across a whole run (default: 6)
//! - `AGENT_MAX_ITERATIONS` - Model turns per run (default: 8)
//! - `AGENT_RETRY_BACKOFF_MS` - Base delay between retries (default: 250)
//! - `AGENT_MAX_RETRY_DELAY_MS` - Cap on one retry delay, `Retry-After` included (default: 30000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_COMPANY_NAME: &str = "Brew & Co.";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Concierge application configuration.
#[derive(Debug, Clone)]
pub struct ConciergeConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Company name rendered into the system prompt
    pub company_name: String,
    /// Claude AI configuration
    pub claude: ClaudeConfig,
    /// Agent loop bounds
    pub agent: AgentSettings,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Claude AI API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Bounds on a single agent run.
///
/// These cap cost and latency against an unreliable upstream model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    /// Retries allowed for one model call before the run fails.
    pub max_step_retries: u32,
    /// Retries allowed across every model call in the run.
    pub max_total_retries: u32,
    /// Model turns allowed before the run stops without an answer.
    pub max_iterations: u32,
    /// Base delay between retries; multiplied by the attempt number.
    pub retry_backoff: Duration,
    /// Upper bound on any single retry delay, including a server's
    /// `Retry-After`.
    pub max_retry_delay: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_step_retries: 2,
            max_total_retries: 6,
            max_iterations: 8,
            retry_backoff: Duration::from_millis(250),
            max_retry_delay: Duration::from_secs(30),
        }
    }
}

impl ConciergeConfig {
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

        let database_url = get_database_url("CONCIERGE_DATABASE_URL")?;
        let host = get_env_or_default("CONCIERGE_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CONCIERGE_HOST".to_string(), e.to_string()))?;
        let port = parse_env_or_default("CONCIERGE_PORT", 3000_u16)?;
        let company_name = get_env_or_default("CONCIERGE_COMPANY_NAME", DEFAULT_COMPANY_NAME);

        let claude = ClaudeConfig::from_env()?;
        let agent = AgentSettings::from_env()?;
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
            company_name,
            claude,
            agent,
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

    /// Returns a reference to the Claude configuration.
    #[must_use]
    pub const fn claude(&self) -> &ClaudeConfig {
        &self.claude
    }
}

/// Load only the database URL, for tools that do not talk to Claude.
///
/// Calls `dotenvy::dotenv()` first, like [`ConciergeConfig::from_env`].
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither `CONCIERGE_DATABASE_URL`
/// nor `DATABASE_URL` is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_database_url("CONCIERGE_DATABASE_URL")
}

impl ClaudeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("CLAUDE_API_KEY")?,
            model: get_env_or_default("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
        })
    }
}

impl AgentSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let backoff_ms = parse_env_or_default(
            "AGENT_RETRY_BACKOFF_MS",
            u64::try_from(defaults.retry_backoff.as_millis()).unwrap_or(250),
        )?;
        let max_delay_ms = parse_env_or_default(
            "AGENT_MAX_RETRY_DELAY_MS",
            u64::try_from(defaults.max_retry_delay.as_millis()).unwrap_or(30_000),
        )?;

        let settings = Self {
            max_step_retries: parse_env_or_default(
                "AGENT_MAX_STEP_RETRIES",
                defaults.max_step_retries,
            )?,
            max_total_retries: parse_env_or_default(
                "AGENT_MAX_TOTAL_RETRIES",
                defaults.max_total_retries,
            )?,
            max_iterations: parse_env_or_default("AGENT_MAX_ITERATIONS", defaults.max_iterations)?,
            retry_backoff: Duration::from_millis(backoff_ms),
            max_retry_delay: Duration::from_millis(max_delay_ms),
        };

        if settings.max_iterations == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "AGENT_MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, using `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
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
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
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
