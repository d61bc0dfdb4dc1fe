use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder session secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub cookie_secure: bool,
}

impl Config {
    /// Reads `TWIXEL_*` variables; `.env` must already be loaded.
    pub fn from_env() -> Result<Self> {
        let host = env_or("TWIXEL_HOST", "0.0.0.0");
        let port: u16 = env_or("TWIXEL_PORT", "3000")
            .parse()
            .context("TWIXEL_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        let session_secret = std::env::var("TWIXEL_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("TWIXEL_SESSION_SECRET is unset or still a placeholder");
        }

        let cookie_secure = matches!(
            env_or("TWIXEL_COOKIE_SECURE", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        Ok(Self {
            addr,
            db_path: env_or("TWIXEL_DB_PATH", "twixel.db").into(),
            session_secret,
            cookie_secure,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
