//! Configuration management for the fire alert system
//!
//! Loads settings from environment variables (and a `.env` file if present)
//! with validation.

use crate::alerting::countdown::CountdownConfig;
use crate::alerting::generator::GeneratorConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Demo provider password, used only to derive the default hash
const DEFAULT_PROVIDER_PASSWORD: &str = "firestation2024";

/// Alert lifecycle timing and simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Seconds before an unanswered alert is dispatched (default: 30)
    pub countdown_seconds: u32,

    /// Remaining seconds at which an alert is shown as urgent (default: 10)
    pub urgent_threshold_seconds: u32,

    /// Owner-side scan period in seconds (default: 5)
    pub owner_scan_interval_seconds: u64,

    /// Chance that an owner scan raises an incident (default: 0.1)
    pub owner_detection_probability: f64,

    /// Provider-side scan period in seconds (default: 10)
    pub provider_scan_interval_seconds: u64,

    /// Chance that a provider scan raises an incident (default: 0.15)
    pub provider_detection_probability: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 30,
            urgent_threshold_seconds: 10,
            owner_scan_interval_seconds: 5,
            owner_detection_probability: 0.1,
            provider_scan_interval_seconds: 10,
            provider_detection_probability: 0.15,
        }
    }
}

impl AlertConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            countdown_seconds: parse_or(
                lookup,
                "FIREWATCH_COUNTDOWN_SECONDS",
                defaults.countdown_seconds,
            )?,
            urgent_threshold_seconds: parse_or(
                lookup,
                "FIREWATCH_URGENT_THRESHOLD_SECONDS",
                defaults.urgent_threshold_seconds,
            )?,
            owner_scan_interval_seconds: parse_or(
                lookup,
                "FIREWATCH_OWNER_SCAN_INTERVAL_SECONDS",
                defaults.owner_scan_interval_seconds,
            )?,
            owner_detection_probability: parse_or(
                lookup,
                "FIREWATCH_OWNER_DETECTION_PROBABILITY",
                defaults.owner_detection_probability,
            )?,
            provider_scan_interval_seconds: parse_or(
                lookup,
                "FIREWATCH_PROVIDER_SCAN_INTERVAL_SECONDS",
                defaults.provider_scan_interval_seconds,
            )?,
            provider_detection_probability: parse_or(
                lookup,
                "FIREWATCH_PROVIDER_DETECTION_PROBABILITY",
                defaults.provider_detection_probability,
            )?,
        })
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.countdown_config().validate()?;
        self.owner_generator_config().validate()?;
        self.provider_generator_config().validate()?;
        Ok(())
    }

    /// Countdown settings for the owner alert controller
    pub fn countdown_config(&self) -> CountdownConfig {
        CountdownConfig {
            seconds: self.countdown_seconds,
            urgent_threshold: self.urgent_threshold_seconds,
        }
    }

    /// Generator settings for the owner camera scan
    pub fn owner_generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            interval: Duration::from_secs(self.owner_scan_interval_seconds),
            probability: self.owner_detection_probability,
        }
    }

    /// Generator settings for the provider property scan
    pub fn provider_generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            interval: Duration::from_secs(self.provider_scan_interval_seconds),
            probability: self.provider_detection_probability,
        }
    }
}

/// Mocked sign-in settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Hex-encoded BLAKE3 digest of the provider password
    pub provider_password_hash: String,

    /// Simulated OAuth round trip in milliseconds (default: 2000)
    pub oauth_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider_password_hash: blake3::hash(DEFAULT_PROVIDER_PASSWORD.as_bytes())
                .to_hex()
                .to_string(),
            oauth_delay_ms: 2000,
        }
    }
}

impl AuthConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let provider_password_hash =
            lookup("FIREWATCH_PROVIDER_PASSWORD_HASH").unwrap_or(defaults.provider_password_hash);

        let config = Self {
            provider_password_hash,
            oauth_delay_ms: parse_or(lookup, "FIREWATCH_OAUTH_DELAY_MS", defaults.oauth_delay_ms)?,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate the configured password hash
    pub fn validate(&self) -> Result<()> {
        self.password_hash_bytes().map(|_| ())
    }

    /// Decode the configured password hash
    pub fn password_hash_bytes(&self) -> Result<[u8; 32]> {
        let mut digest = [0u8; 32];
        hex::decode_to_slice(&self.provider_password_hash, &mut digest).map_err(|_| {
            Error::config("FIREWATCH_PROVIDER_PASSWORD_HASH must be 64 hex characters")
        })?;
        Ok(digest)
    }

    pub fn oauth_delay(&self) -> Duration {
        Duration::from_millis(self.oauth_delay_ms)
    }
}

/// Session persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the session key file
    pub store_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub alerts: AlertConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let alerts = AlertConfig::from_lookup(&lookup)?;
        alerts.validate()?;

        let auth = AuthConfig::from_lookup(&lookup)?;

        let session = SessionConfig {
            store_dir: lookup("FIREWATCH_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".firewatch")),
        };

        let logging = LoggingConfig {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: lookup("LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
        };

        Ok(Self {
            alerts,
            auth,
            session,
            logging,
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Result<Self> {
        let alerts = AlertConfig {
            owner_scan_interval_seconds: 1,
            owner_detection_probability: 1.0, // Always fire in tests
            provider_scan_interval_seconds: 1,
            provider_detection_probability: 1.0,
            ..AlertConfig::default()
        };

        let auth = AuthConfig {
            oauth_delay_ms: 10,
            ..AuthConfig::default()
        };

        let session = SessionConfig {
            store_dir: std::env::temp_dir().join(format!("firewatch-{}", uuid::Uuid::new_v4())),
        };

        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Ok(Self {
            alerts,
            auth,
            session,
            logging,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("Invalid {name}: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config.alerts.countdown_seconds, 30);
        assert_eq!(config.alerts.urgent_threshold_seconds, 10);
        assert_eq!(config.alerts.owner_scan_interval_seconds, 5);
        assert_eq!(config.alerts.provider_scan_interval_seconds, 10);
        assert!((config.alerts.owner_detection_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.auth.oauth_delay(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = load(&[
            ("FIREWATCH_COUNTDOWN_SECONDS", "15"),
            ("FIREWATCH_OWNER_DETECTION_PROBABILITY", "0.5"),
            ("FIREWATCH_SESSION_DIR", "/tmp/fw"),
        ])
        .unwrap();

        assert_eq!(config.alerts.countdown_seconds, 15);
        assert_eq!(config.alerts.countdown_config().seconds, 15);
        assert_eq!(config.session.store_dir, PathBuf::from("/tmp/fw"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("FIREWATCH_COUNTDOWN_SECONDS", "soon")]).is_err());
        assert!(load(&[("FIREWATCH_COUNTDOWN_SECONDS", "0")]).is_err());
        assert!(
            load(&[("FIREWATCH_PROVIDER_DETECTION_PROBABILITY", "1.5")])
                .is_err()
        );
        assert!(
            load(&[("FIREWATCH_PROVIDER_PASSWORD_HASH", "abcd")]).is_err()
        );
    }

    #[test]
    fn test_default_password_hash_decodes() {
        let auth = AuthConfig::default();
        let digest = auth.password_hash_bytes().unwrap();
        assert_eq!(digest, *blake3::hash(DEFAULT_PROVIDER_PASSWORD.as_bytes()).as_bytes());
    }

    #[test]
    fn test_testing_config_is_valid() {
        let config = Config::for_testing().unwrap();
        assert!(config.alerts.validate().is_ok());
        assert!(config.auth.validate().is_ok());
    }
}
