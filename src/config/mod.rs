use config::{ConfigError, Environment};
use serde::Deserialize;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Runtime configuration, read from the process environment (and `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the movie metadata API.
    pub api_uri: String,
    pub api_key: String,
    /// Connection string for the document store.
    pub database_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails if `API_URI`, `API_KEY` or `DATABASE_URL` is missing or blank.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    pub(crate) fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config: Config = config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("API_URI", &self.api_uri),
            ("API_KEY", &self.api_key),
            ("DATABASE_URL", &self.database_url),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "{} not found in environment variables",
                    name
                )));
            }
        }

        Ok(())
    }
}
