use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::ssg_client::Endpoint;

/// Application configuration loaded from environment variables.
/// Startup fails if any value is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub endpoint: Endpoint,
    /// Endpoint base URL, or `SSG_BASE_URL` when set.
    pub base_url: String,
    /// Upper bound on every outbound SSG call.
    pub request_timeout: Duration,
    /// Session to load at startup instead of waiting for an upload.
    pub preload: Option<SessionSeed>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSeed {
    pub uen: String,
    pub encryption_key: String,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint: Endpoint = lookup("SSG_ENDPOINT")
            .unwrap_or_else(|| "uat".to_string())
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("SSG_ENDPOINT must be production, uat or mock")?;

        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS is 0"))
                .context("REQUEST_TIMEOUT_SECS must be at least 1 second");
        }

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8502".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            endpoint,
            base_url: lookup("SSG_BASE_URL").unwrap_or_else(|| endpoint.base_url().to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            preload: session_seed(&lookup)?,
        })
    }
}

/// All four session variables, or none of them.
fn session_seed(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<SessionSeed>> {
    const KEYS: [&str; 4] = ["SSG_UEN", "SSG_ENCRYPTION_KEY", "SSG_CERT_PATH", "SSG_KEY_PATH"];

    let values: Vec<Option<String>> = KEYS.iter().map(|k| lookup(k)).collect();
    match values.as_slice() {
        [Some(uen), Some(key), Some(cert), Some(pem)] => Ok(Some(SessionSeed {
            uen: uen.clone(),
            encryption_key: key.clone(),
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(pem),
        })),
        [None, None, None, None] => Ok(None),
        _ => {
            let missing: Vec<_> = KEYS
                .iter()
                .zip(&values)
                .filter(|(_, v)| v.is_none())
                .map(|(k, _)| *k)
                .collect();
            Err(anyhow!(
                "Session preload is incomplete; missing: {}",
                missing.join(", ")
            ))
        }
    }
}
