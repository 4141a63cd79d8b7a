use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Per-request timeout. `None` leaves it to the HTTP stack.
    pub timeout: Option<Duration>,
    /// Directory that receives a copy of every successful response body.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: None,
            log_dir: None,
        })
    }

    /// Read `BLOG_API_URL`, `BLOG_API_TIMEOUT_MS` and `CLIENT_LOG_DIR`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("BLOG_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = match std::env::var("BLOG_API_TIMEOUT_MS") {
            Ok(ms) => {
                let ms = ms
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| Error::InvalidConfig(format!("BLOG_API_TIMEOUT_MS={}", ms)))?;
                Some(Duration::from_millis(ms))
            }
            Err(_) => None,
        };
        let log_dir = std::env::var("CLIENT_LOG_DIR").ok().map(PathBuf::from);

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout,
            log_dir,
        })
    }
}

/// Endpoint paths are joined relative to the base, so it must end with a slash.
fn parse_base_url(s: &str) -> Result<Url> {
    let url = if s.ends_with('/') {
        Url::parse(s)?
    } else {
        Url::parse(&format!("{}/", s))?
    };
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!("BLOG_API_URL={}", s)));
    }
    Ok(url)
}
