use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Recipient id for admin-facing notifications.
    pub admin_recipient_id: String,
    pub notify_max_attempts: u32,
    pub notify_retry_base: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("ONB_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid ONB_LISTEN_ADDR")?;
        let db_path = env_or("ONB_DB_PATH", "./db/onboarding.db");
        let cors_allow = env_or("ONB_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("ONB_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let admin_recipient_id = env_or("ONB_ADMIN_RECIPIENT_ID", "admin");
        let notify_max_attempts: u32 = env_or("ONB_NOTIFY_MAX_ATTEMPTS", "5")
            .parse()
            .unwrap_or(5)
            .max(1);
        let retry_base_ms: u64 = env_or("ONB_NOTIFY_RETRY_BASE_MS", "500")
            .parse()
            .unwrap_or(500);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            admin_recipient_id,
            notify_max_attempts,
            notify_retry_base: Duration::from_millis(retry_base_ms),
        })
    }
}
