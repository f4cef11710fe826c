use std::str::FromStr;

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};

use crate::domain::services::QueryConfig;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub query: QueryConfig,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// JSON array of properties loaded by the memory backend.
    pub seed_path: Option<String>,
    #[serde(default)]
    pub run_migrations: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_directory = base_path.join("config");

    let environment_name = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
    let environment = Environment::from_str(&environment_name).map_err(|_| {
        config::ConfigError::Message(format!(
            "Failed to parse APP_ENVIRONMENT '{}'",
            environment_name
        ))
    })?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("PROPERTY")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{LimitPolicy, LongitudeScaling};

    fn parse(yaml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn query_settings_default_when_absent() {
        let settings = parse(
            r#"
application:
  host: 127.0.0.1
  port: 8080
store:
  backend: memory
  seed_path: data/properties.json
"#,
        );

        assert_eq!(settings.application.port, 8080);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert!(settings.database.is_none());
        assert_eq!(settings.query, QueryConfig::default());
    }

    #[test]
    fn query_settings_override_individual_fields() {
        let settings = parse(
            r#"
application:
  host: 0.0.0.0
  port: "9000"
  allowed_origins: ["https://map.example.com"]
store:
  backend: postgres
  run_migrations: true
database:
  username: postgres
  password: secret
  port: 5432
  host: localhost
  database_name: properties
  require_ssl: false
query:
  longitude_scaling: degrees
  search_limit:
    default: 20
    max: 40
"#,
        );

        assert_eq!(settings.store.backend, StoreBackend::Postgres);
        assert!(settings.store.run_migrations);
        assert_eq!(settings.application.allowed_origins.len(), 1);
        assert_eq!(settings.query.longitude_scaling, LongitudeScaling::Degrees);
        assert_eq!(settings.query.search_limit, LimitPolicy::new(20, 40));
        assert_eq!(settings.query.nearby_limit, LimitPolicy::new(25, 100));
    }

    #[test]
    fn environment_names_are_case_insensitive() {
        assert!(matches!(
            Environment::from_str("Production").unwrap(),
            Environment::Production
        ));
        assert!(Environment::from_str("staging").is_err());
    }
}
