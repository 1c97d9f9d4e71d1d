use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use buildledger_core::constants::DEFAULT_CURRENCY;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// ISO code used when rendering amounts for display.
    pub default_currency: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("BL_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .context("Invalid BL_LISTEN_ADDR")?;
        let db_path =
            std::env::var("BL_DB_PATH").unwrap_or_else(|_| "./db/buildledger.db".into());
        let cors_allow = std::env::var("BL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("BL_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let default_currency = std::env::var("BL_DEFAULT_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .ok()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            default_currency,
        })
    }
}
