//! Layered server configuration
//!
//! defaults -> YAML file -> environment (`APP__*`) -> CLI overrides

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Top-level server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub persona_service: persona_service::Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Data directory; `~` expands to the user's home
    #[serde(default = "default_home_dir")]
    pub home_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            home_dir: default_home_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string; empty means a SQLite file under `server.home_dir`
    #[serde(default)]
    pub dsn: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Command line values that take precedence over every other layer
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

pub const MOCK_DSN: &str = "sqlite::memory:";

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `APP__` env vars.
    ///
    /// The home directory is expanded and created, and an empty DSN is
    /// resolved to a SQLite file inside it.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment.extract().context("invalid configuration")?;
        config.normalize()?;
        Ok(config)
    }

    pub fn apply_cli_overrides(&mut self, args: &CliOverrides) {
        if let Some(port) = args.port {
            self.server.bind_addr.set_port(port);
        }
        if args.mock {
            self.database.dsn = MOCK_DSN.to_string();
        }
        match args.verbose {
            0 => {}
            1 => self.logging.level = "info".to_string(),
            2 => self.logging.level = "debug".to_string(),
            _ => self.logging.level = "trace".to_string(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn normalize(&mut self) -> Result<()> {
        let home = expand_home(&self.server.home_dir)?;
        std::fs::create_dir_all(&home)
            .with_context(|| format!("failed to create home dir {}", home.display()))?;
        self.server.home_dir = home.to_string_lossy().into_owned();

        if self.database.dsn.trim().is_empty() {
            self.database.dsn = format!("sqlite://{}?mode=rwc", home.join("persona.db").display());
        }
        Ok(())
    }
}

fn expand_home(dir: &str) -> Result<PathBuf> {
    let Some(rest) = dir.strip_prefix('~') else {
        return Ok(PathBuf::from(dir));
    };
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .context("cannot expand '~': no home directory in environment")?;
    Ok(PathBuf::from(home).join(rest.trim_start_matches(['/', '\\'])))
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8087))
}

fn default_home_dir() -> String {
    "~/.persona_server".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn test_yaml_layer_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("data");
        let file = dir.path().join("server.yaml");
        std::fs::write(
            &file,
            format!(
                "server:\n  home_dir: {}\nlogging:\n  format: json\npersona_service:\n  session_max_age: 7d\n",
                home.display()
            ),
        )
        .unwrap();

        let config = AppConfig::load_or_default(Some(&file)).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.persona_service.session_max_age,
            Duration::from_secs(7 * 24 * 3600)
        );
        assert_eq!(config.server.bind_addr.port(), 8087);
        assert!(home.is_dir());
        assert!(config.database.dsn.starts_with("sqlite://"));
        assert!(config.database.dsn.ends_with("persona.db?mode=rwc"));
    }

    #[test]
    fn test_env_layer_wins_over_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "server.yaml",
                "server:\n  home_dir: ./home\ndatabase:\n  max_connections: 3\n",
            )?;
            jail.set_env("APP__DATABASE__MAX_CONNECTIONS", "7");
            jail.set_env("APP__PERSONA_SERVICE__TOKEN_SECRET", "s3cret");

            let config = AppConfig::load_or_default(Some(Path::new("server.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.database.max_connections, 7);
            assert_eq!(config.persona_service.token_secret, "s3cret");
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&CliOverrides {
            port: Some(9999),
            verbose: 2,
            mock: true,
        });
        assert_eq!(config.server.bind_addr.port(), 9999);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.dsn, MOCK_DSN);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("server.yaml", "server:\n  home_dir: ./home\n  bogus: 1\n")?;
            assert!(AppConfig::load_or_default(Some(Path::new("server.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_print_config_round_trips() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.server.bind_addr, config.server.bind_addr);
        assert_eq!(
            parsed.persona_service.session_max_age,
            config.persona_service.session_max_age
        );
    }

    #[test]
    fn test_expand_home_passthrough() {
        assert_eq!(expand_home("/var/lib/x").unwrap(), PathBuf::from("/var/lib/x"));
    }
}
