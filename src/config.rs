//! Runtime settings: defaults, an optional RON file, `.env`, then environment overrides.
//!
//! Environment variables:
//! - `POKE_BATTLE_CONFIG` - path to a RON settings file (default: `poke-battle.ron` if present)
//! - `SERVER_NAME`, `ENVIRONMENT`
//! - `LOG_LEVEL` (default: info), `LOG_FORMAT` (`json` | `pretty`, default: json)
//! - `POKEAPI_BASE_URL`, `POKEAPI_TIMEOUT` (seconds, default: 30)
//! - `MAX_TURNS` (default: 1000)
//! - `ENABLE_METRICS` (default: true)

use crate::battle::engine::BattleOptions;
use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_PATH_VAR: &str = "POKE_BATTLE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "poke-battle.ron";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub pokeapi: PokeApiSettings,
    pub battle: BattleOptions,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    pub version: String,
    pub environment: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "poke-battle-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "production".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `poke_battle=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokeApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// How many moves `get_pokemon_info` details.
    pub info_move_limit: usize,
}

impl Default for PokeApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            timeout_secs: 30,
            info_move_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Settings {
    /// Load settings the way the binaries do.
    pub fn load() -> ConfigResult<Self> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();

        let mut settings = match config_file_path() {
            Some(path) => Self::from_ron_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_ron_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text, &path.display().to_string())
    }

    pub fn from_ron_str(text: &str, origin: &str) -> ConfigResult<Self> {
        ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("SERVER_NAME") {
            self.server.name = name;
        }
        if let Some(environment) = lookup("ENVIRONMENT") {
            self.server.environment = environment;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = parse_value("LOG_FORMAT", &format)?;
        }
        if let Some(base_url) = lookup("POKEAPI_BASE_URL") {
            self.pokeapi.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = lookup("POKEAPI_TIMEOUT") {
            self.pokeapi.timeout_secs = parse_value("POKEAPI_TIMEOUT", &timeout)?;
        }
        if let Some(max_turns) = lookup("MAX_TURNS") {
            self.battle.max_turns = parse_value("MAX_TURNS", &max_turns)?;
        }
        if let Some(enabled) = lookup("ENABLE_METRICS") {
            self.metrics.enabled = parse_bool("ENABLE_METRICS", &enabled)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.battle.max_turns == 0 {
            return Err(invalid("battle.max_turns", "0"));
        }
        if self.pokeapi.timeout_secs == 0 {
            return Err(invalid("pokeapi.timeout_secs", "0"));
        }
        if self.pokeapi.base_url.trim().is_empty() {
            return Err(invalid("pokeapi.base_url", &self.pokeapi.base_url));
        }
        Ok(())
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    default_path.exists().then_some(default_path)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pokeapi.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(settings.pokeapi.timeout_secs, 30);
        assert_eq!(settings.battle.max_turns, 1000);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert!(settings.metrics.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_env(lookup_from(&[
                ("LOG_LEVEL", "DEBUG"),
                ("LOG_FORMAT", "pretty"),
                ("POKEAPI_BASE_URL", "http://localhost:8080/api/v2/"),
                ("POKEAPI_TIMEOUT", "5"),
                ("MAX_TURNS", "250"),
                ("ENABLE_METRICS", "0"),
                ("ENVIRONMENT", "staging"),
            ]))
            .unwrap();

        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.pokeapi.base_url, "http://localhost:8080/api/v2");
        assert_eq!(settings.pokeapi.timeout_secs, 5);
        assert_eq!(settings.battle.max_turns, 250);
        assert!(!settings.metrics.enabled);
        assert_eq!(settings.server.environment, "staging");
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(lookup_from(&[("MAX_TURNS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "MAX_TURNS"));
    }

    #[test]
    fn test_zero_turn_cap_fails_validation() {
        let mut settings = Settings::default();
        settings.battle.max_turns = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_ron_file_keeps_defaults() {
        let text = r#"(
            logging: (format: pretty),
            battle: (max_turns: 64),
        )"#;
        let settings = Settings::from_ron_str(text, "inline").unwrap();
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.battle.max_turns, 64);
        assert_eq!(settings.pokeapi, PokeApiSettings::default());
    }

    #[test]
    fn test_malformed_ron_reports_origin() {
        let err = Settings::from_ron_str("(battle: (max_turns: \"x\"))", "poke-battle.ron").unwrap_err();
        assert!(err.to_string().contains("poke-battle.ron"));
    }
}
