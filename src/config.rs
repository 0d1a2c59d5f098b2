use serde::Deserialize;

use crate::api::state::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_MINUTES};
use crate::services::history::DEFAULT_HISTORY_CAPACITY;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path of the JSON catalog file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Viewing history entries kept per session
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Minutes of inactivity after which a session is discarded
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,

    /// Upper bound on concurrently held sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_catalog_path() -> String {
    "content_database.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_session_idle_minutes() -> i64 {
    DEFAULT_SESSION_IDLE_MINUTES
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn session_idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_idle_minutes.max(1))
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
