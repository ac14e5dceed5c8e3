// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::net::SocketAddr;

pub const MAX_ANSWER_LENGTH: usize = 150;
pub const ANSWER_CHOICE_COUNT: usize = 4;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub log_dir: String,
    pub cors_origins: Vec<String>,
    /// Optional JSON file with categories and bank questions loaded at startup.
    pub question_bank_seed: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = parse_var("BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let max_connections = parse_var("DB_MAX_CONNECTIONS", "5")?;

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let cors_origins = split_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let question_bank_seed = env::var("QUESTION_BANK_SEED")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            max_connections,
            log_dir,
            cors_origins,
            question_bank_seed,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::Invalid { key, value })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = split_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = ConfigError::Invalid {
            key: "BIND_ADDR",
            value: "nowhere".to_string(),
        };
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
