//! Process configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CATALOG_PATH: &str = "products.json";
pub const DEFAULT_SHOPPER_NAME: &str = "there";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// JSON document with `categories` and `products`
    pub catalog_path: PathBuf,
    /// Name used in greetings
    pub shopper_name: String,
    /// Server-held sessions unused for this long are dropped
    pub session_idle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            shopper_name: DEFAULT_SHOPPER_NAME.to_string(),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("CHATCART_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            catalog_path: lookup("CHATCART_CATALOG_PATH")
                .map_or(defaults.catalog_path, PathBuf::from),
            shopper_name: lookup("CHATCART_SHOPPER_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.shopper_name),
            session_idle_timeout: lookup("CHATCART_SESSION_IDLE_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .map_or(defaults.session_idle_timeout, Duration::from_secs),
        }
    }
}
