// src/config/mod.rs
// All values come from the environment (optionally via .env), with defaults
// suitable for local development.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Auth Configuration
    pub jwt_secret: String,
    pub token_ttl_days: i64,

    // ── CORS Settings
    pub cors_origin: String,

    // ── Logging Configuration
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load from .env first if it exists; a missing file is not an error.
        let _ = dotenvy::dotenv();

        Self {
            database_url: env_var_or("DATABASE_URL", "sqlite:./taskhub.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 10),
            host: env_var_or("TASKHUB_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TASKHUB_PORT", 8000),
            jwt_secret: env_var_or(
                "JWT_SECRET",
                "taskhub-jwt-secret-change-in-production".to_string(),
            ),
            token_ttl_days: env_var_or("TASKHUB_TOKEN_TTL_DAYS", 30),
            cors_origin: env_var_or("TASKHUB_CORS_ORIGIN", "http://localhost:3000".to_string()),
            log_level: env_var_or("TASKHUB_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
