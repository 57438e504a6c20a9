use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the request body, resume included.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: lookup("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
