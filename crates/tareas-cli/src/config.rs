use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use tareas_api::AuthConfig;
use tareas_core::models::UserId;
use tareas_core::recurrence::{RecurrenceConfig, DEFAULT_MAX_ITERATIONS};

pub const CONFIG_FILE: &str = "tareas.toml";

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// User the CLI acts as when `--user` is not given.
    #[serde(default = "default_user")]
    pub default_user: UserId,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub recurrence: RecurrenceSettings,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Limits applied when expanding recurring tasks
#[derive(Deserialize, Debug, Clone)]
pub struct RecurrenceSettings {
    /// Safety cap on the number of steps of any recurrence walk
    pub max_iterations: usize,
}

impl Default for RecurrenceSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl From<&RecurrenceSettings> for RecurrenceConfig {
    fn from(settings: &RecurrenceSettings) -> Self {
        RecurrenceConfig {
            max_iterations: settings.max_iterations,
        }
    }
}

fn default_database_path() -> String {
    "tareas.db".to_string()
}

fn default_user() -> UserId {
    1
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    /// `tareas.toml` in the working directory, overridden by `TAREAS_*`
    /// environment variables (`__` separates nested keys).
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("TAREAS_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_any_source() {
        let config = Config::from_figment(Figment::new()).unwrap();
        assert_eq!(config.database_path, "tareas.db");
        assert_eq!(config.default_user, 1);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.recurrence.max_iterations, 1000);
        assert!(config.auth.tokens.is_empty());
    }

    #[test]
    fn toml_overrides_nested_keys() {
        let toml = r#"
            database_path = "/tmp/otra.db"
            default_user = 3

            [server]
            host = "0.0.0.0"
            port = 9090

            [recurrence]
            max_iterations = 50

            [auth.tokens]
            abc = 3
            xyz = 4
        "#;
        let config = Config::from_figment(Figment::new().merge(Toml::string(toml))).unwrap();

        assert_eq!(config.database_path, "/tmp/otra.db");
        assert_eq!(config.default_user, 3);
        assert_eq!(config.server.port, 9090);
        assert_eq!(RecurrenceConfig::from(&config.recurrence).max_iterations, 50);
        assert_eq!(config.auth.user_for("xyz"), Some(4));
        assert_eq!(config.auth.user_for("nope"), None);
    }

    #[test]
    fn malformed_values_are_errors() {
        let config = Config::from_figment(Figment::new().merge(Toml::string("default_user = \"ana\"")));
        assert!(config.is_err());
    }
}
