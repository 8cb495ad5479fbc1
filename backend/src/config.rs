// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// How long an emailed magic token stays redeemable.
    pub magic_token_ttl_minutes: i64,
    /// Period of the expired-token sweep.
    pub token_sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = parse_or("JWT_EXPIRATION", 60 * 60 * 24 * 30);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = parse_or("PORT", 3000);

        let magic_token_ttl_minutes = parse_or("MAGIC_TOKEN_TTL_MINUTES", 3);

        let token_sweep_interval_secs = parse_or("TOKEN_SWEEP_INTERVAL_SECS", 180);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            magic_token_ttl_minutes,
            token_sweep_interval_secs,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
