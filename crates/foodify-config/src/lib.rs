//! # foodify-config
//!
//! Runtime settings, read from the process environment after an optional
//! `.env` file. Every key has a default except the database credentials.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDRESS` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `DB_USER`, `DB_PASSWORD` | unset |
//! | `DB_CLUSTER` | `cluster0.v5wedkm.mongodb.net` |
//! | `DB_APP_NAME` | `Cluster0` |
//! | `DB_NAME` | `Foodify` |
//! | `DB_URI` | unset; overrides the assembled connection string |
//! | `CORS_ORIGINS` | `http://localhost:5173,https://foodify-25c2d.web.app` |
//! | `SEED_FILE` | unset; JSON seed for the in-memory store |

use config::{Config, Environment, Source};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://foodify-25c2d.web.app";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    pub port: u16,
    pub db_user: Option<String>,
    pub db_password: Option<SecretString>,
    pub db_cluster: String,
    pub db_app_name: String,
    pub db_name: String,
    pub db_uri: Option<SecretString>,
    pub cors_origins: String,
    pub seed_file: Option<String>,
}

impl Settings {
    /// Loads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }
        Self::from_source(Environment::default())
    }

    /// Applies defaults underneath `source`.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("db_cluster", "cluster0.v5wedkm.mongodb.net")?
            .set_default("db_app_name", "Cluster0")?
            .set_default("db_name", "Foodify")?
            .set_default("cors_origins", DEFAULT_CORS_ORIGINS)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// `DB_URI` when set, otherwise an SRV string for the Atlas cluster with
    /// the credentials interpolated.
    pub fn connection_uri(&self) -> SecretString {
        if let Some(uri) = &self.db_uri {
            return uri.expose_secret().to_string().into();
        }

        let options = format!("retryWrites=true&w=majority&appName={}", self.db_app_name);
        let uri = match (&self.db_user, &self.db_password) {
            (Some(user), Some(password)) => format!(
                "mongodb+srv://{user}:{}@{}/?{options}",
                password.expose_secret(),
                self.db_cluster
            ),
            _ => {
                log::warn!("DB_USER/DB_PASSWORD not set; connecting without credentials");
                format!("mongodb+srv://{}/?{options}", self.db_cluster)
            }
        };
        uri.into()
    }

    /// `CORS_ORIGINS` split on commas, blanks dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}
