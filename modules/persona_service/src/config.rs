//! Configuration for persona service module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transaction isolation level handed through to the database engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl From<IsolationLevel> for sea_orm::IsolationLevel {
    fn from(level: IsolationLevel) -> Self {
        match level {
            IsolationLevel::ReadUncommitted => Self::ReadUncommitted,
            IsolationLevel::ReadCommitted => Self::ReadCommitted,
            IsolationLevel::RepeatableRead => Self::RepeatableRead,
            IsolationLevel::Serializable => Self::Serializable,
        }
    }
}

/// Persona service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Lifetime of a freshly created or extended session
    #[serde(default = "default_session_max_age", with = "humantime_serde")]
    pub session_max_age: Duration,

    /// How often a session expiry is pushed forward on use
    #[serde(default = "default_session_update_age", with = "humantime_serde")]
    pub session_update_age: Duration,

    /// Lifetime of a verification token
    #[serde(default = "default_verification_token_max_age", with = "humantime_serde")]
    pub verification_token_max_age: Duration,

    /// Mixed into verification token hashes
    #[serde(default)]
    pub token_secret: String,

    /// Period of the expired session/token sweeper
    #[serde(default = "default_sweep_interval", with = "humantime_serde")]
    pub sweep_interval: Duration,

    /// Isolation level for multi-statement operations (ignored on SQLite)
    #[serde(default)]
    pub isolation_level: IsolationLevel,

    /// Page size used when a listing does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound for any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_max_age: default_session_max_age(),
            session_update_age: default_session_update_age(),
            verification_token_max_age: default_verification_token_max_age(),
            token_secret: String::new(),
            sweep_interval: default_sweep_interval(),
            isolation_level: IsolationLevel::default(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Upper bound on configured lifetimes; keeps timestamp arithmetic in range
const MAX_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

impl Config {
    /// Reject settings the service cannot operate with
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("session_max_age", self.session_max_age),
            ("session_update_age", self.session_update_age),
            ("verification_token_max_age", self.verification_token_max_age),
        ] {
            if value.is_zero() || value > MAX_LIFETIME {
                anyhow::bail!("{name} must be between 1s and 10 years");
            }
        }
        if self.session_update_age > self.session_max_age {
            anyhow::bail!("session_update_age must not exceed session_max_age");
        }
        if self.sweep_interval.is_zero() {
            anyhow::bail!("sweep_interval must be positive");
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            anyhow::bail!("page sizes must be positive");
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!("default_page_size must not exceed max_page_size");
        }
        Ok(())
    }

    pub fn session_max_age(&self) -> chrono::Duration {
        to_chrono(self.session_max_age)
    }

    pub fn session_update_age(&self) -> chrono::Duration {
        to_chrono(self.session_update_age)
    }

    pub fn verification_token_max_age(&self) -> chrono::Duration {
        to_chrono(self.verification_token_max_age)
    }

    /// Clamp a requested limit into `1..=max_page_size`
    pub fn page_limit(&self, requested: u64) -> u64 {
        if requested == 0 {
            self.default_page_size
        } else {
            requested.min(self.max_page_size)
        }
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d.min(MAX_LIFETIME)).unwrap_or_else(|_| chrono::Duration::days(1))
}

fn default_session_max_age() -> Duration {
    Duration::from_secs(30 * 24 * 60 * 60)
}

fn default_session_update_age() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_verification_token_max_age() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    200
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session_max_age(), chrono::Duration::days(30));
        assert_eq!(cfg.isolation_level, IsolationLevel::ReadCommitted);
    }

    #[test]
    fn test_deserialize_humantime_and_isolation() {
        let cfg: Config = serde_json::from_value(serde_json::json!({
            "session_max_age": "7d",
            "session_update_age": "1h",
            "isolation_level": "serializable"
        }))
        .unwrap();
        assert_eq!(cfg.session_max_age, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(cfg.session_update_age, Duration::from_secs(3600));
        assert_eq!(cfg.isolation_level, IsolationLevel::Serializable);
        assert_eq!(cfg.default_page_size, 50);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let res: Result<Config, _> = serde_json::from_value(serde_json::json!({ "bogus": 1 }));
        assert!(res.is_err());
    }

    #[test]
    fn test_validate_rejects_inconsistent_values() {
        let cfg = Config {
            session_update_age: Duration::from_secs(100 * 24 * 3600),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            default_page_size: 500,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_page_limit_clamps() {
        let cfg = Config::default();
        assert_eq!(cfg.page_limit(0), 50);
        assert_eq!(cfg.page_limit(10), 10);
        assert_eq!(cfg.page_limit(10_000), 200);
    }
}
