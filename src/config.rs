use std::time::Duration;

use serde::Deserialize;

/// API version segment prepended to every request path
pub const API_VERSION: &str = "v2beta";

/// Base URL of the developer API
pub const API_URL: &str = "https://api.bit.io";

/// Identifies this client to the service
pub const APP_NAME: &str = "rust-bitdotio-sdk";

pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USER_AGENT: &str = concat!("rust-bitdotio-sdk/", env!("CARGO_PKG_VERSION"));

/// Host for direct database connections
pub const DB_HOST: &str = "db.bit.io";

pub const DB_PORT: u16 = 5432;

pub const SSL_MODE: &str = "require";

/// Minimum number of idle connections kept per pool
pub const POOL_MIN_CONNS: u32 = 0;

/// One second less than the server-side timeout for idle connections
pub const MAX_CONN_IDLE_TIME: Duration = Duration::from_secs(299);

/// Client configuration loaded from `BITDOTIO_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Access token, used both for the API and as the database password
    pub token: String,

    /// Developer API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Fully-qualified database (`owner/name`) the demo binary queries
    #[serde(default)]
    pub database: Option<String>,

    /// Pool size cap; 0 keeps the driver default
    #[serde(default)]
    pub max_connections: u32,
}

fn default_api_url() -> String {
    API_URL.to_string()
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("BITDOTIO_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
