//! Process configuration read from the environment.
//!
//! Every value has a fallback so the service starts with no environment at
//! all (pointing at a local invoicing API). Only a value that is present but
//! unusable is an error. A `.env` file, when present, fills in variables the
//! process environment lacks.

use std::{collections::HashMap, env, io::Read};

use fiscal_core::{
    client::{DEFAULT_API_VERSION, DEFAULT_TIME_ZONE},
    FiscalSettings,
};
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_API_URL: &str = "http://localhost:5001";
const DEVELOPMENT: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("unreadable .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fiscal: FiscalSettings,
    /// `APP_ENV=development`: error responses carry the underlying detail.
    pub development: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => {
                info!("Loading variables from .env");
                read_env_file(iter)?
            }
            Err(e) if e.not_found() => {
                debug!("No .env file found");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_lookup(layered(&file, |key| env::var(key).ok()))
    }

    /// Build from an arbitrary key lookup, so tests never touch the real
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => {
                info!("PORT not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let api_url = or_default(&lookup, "FISCALAPI_API_URL", DEFAULT_API_URL);
        let api_key = or_warn(&lookup, "FISCALAPI_API_KEY");
        let tenant = or_warn(&lookup, "FISCALAPI_TENANT");

        let mut fiscal = FiscalSettings::new(&api_url, &api_key, &tenant);
        fiscal.api_version = or_default(&lookup, "FISCALAPI_API_VERSION", DEFAULT_API_VERSION);
        fiscal.time_zone = or_default(&lookup, "FISCALAPI_TIME_ZONE", DEFAULT_TIME_ZONE);

        Ok(Self {
            host: or_default(&lookup, "HOST", DEFAULT_HOST),
            port,
            fiscal,
            development: lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case(DEVELOPMENT)),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_env_file<R: Read>(iter: dotenvy::Iter<R>) -> Result<HashMap<String, String>, ConfigError> {
    Ok(iter.collect::<Result<HashMap<_, _>, dotenvy::Error>>()?)
}

/// `env` first, then the `.env` values.
fn layered<'a>(
    file: &'a HashMap<String, String>,
    env: impl Fn(&str) -> Option<String> + 'a,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| env(key).or_else(|| file.get(key).cloned())
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn or_warn(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        warn!("Environment variable {key} not found, upstream calls will be rejected");
        String::new()
    })
}
