use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the hosted backend (data + storage + auth share it).
    pub backend_url: String,
    /// Public key, used for auth calls.
    pub anon_key: String,
    /// Privileged key, used for data and storage calls.
    pub service_key: String,
    /// Empty string disables the board cache entirely.
    pub redis_url: String,
    pub board_ttl_seconds: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8000"),
            backend_url: require("BACKEND_URL"),
            anon_key: read_secret("BACKEND_ANON_KEY"),
            service_key: read_secret("BACKEND_SERVICE_KEY"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            board_ttl_seconds: try_load("BOARD_TTL_SECONDS", "86400"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from the container secret mount; a plain environment
/// variable of the same name wins for local development.
fn read_secret(secret_name: &str) -> String {
    if let Ok(value) = env::var(secret_name) {
        return value;
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}
