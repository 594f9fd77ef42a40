//! Process-level configuration: environment variable names and defaults.
//!
//! Connection profiles are stored in the persistent store, not here. This
//! module only covers the handful of settings that select where the process
//! listens, where it keeps its data and which platform it talks to.

/// Default endpoint constants.
pub mod endpoints {
    /// Downstream platform REST API used when `API_ENDPOINT` is unset.
    pub const PLATFORM_API: &str = "http://api-v2:3000/v2";
}

/// Default values.
pub mod defaults {
    /// Administrative API port.
    pub const API_SERVER_PORT: u16 = 3000;
    /// Directory holding the store file.
    pub const DATA_DIR: &str = "./data";
    /// Store file name inside the data directory.
    pub const STORE_FILE: &str = "kentix.redb";
    /// Gateway request timeout when a configuration does not set one, in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    /// Platform request timeout, in seconds.
    pub const PLATFORM_TIMEOUT_SECS: u64 = 30;
    /// Scheduler tick in milliseconds.
    pub const TICK_INTERVAL_MS: u64 = 1000;
    /// Log filter used when `RUST_LOG` is unset.
    pub const LOG_FILTER: &str = "kentix=info";
}

/// Environment variable names.
pub mod env_vars {
    pub const API_SERVER_PORT: &str = "API_SERVER_PORT";
    pub const API_ENDPOINT: &str = "API_ENDPOINT";
    pub const API_TOKEN: &str = "API_TOKEN";
    pub const DATA_DIR: &str = "KENTIX_DATA_DIR";
    pub const LOG_JSON: &str = "KENTIX_LOG_JSON";
    /// Device type table override, e.g. `1=access-point,8=alarm-manager`.
    pub const DEVICE_TYPES: &str = "KENTIX_DEVICE_TYPES";
}

/// Administrative API port from `API_SERVER_PORT`, or the default.
pub fn api_server_port() -> u16 {
    std::env::var(env_vars::API_SERVER_PORT)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults::API_SERVER_PORT)
}

/// Platform API endpoint from `API_ENDPOINT`, or the default.
pub fn platform_endpoint() -> String {
    std::env::var(env_vars::API_ENDPOINT)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_endpoint(&s))
        .unwrap_or_else(|| endpoints::PLATFORM_API.to_string())
}

/// Platform API key from `API_TOKEN`. Empty when unset.
pub fn platform_token() -> String {
    std::env::var(env_vars::API_TOKEN).unwrap_or_default()
}

/// Whether JSON log output was requested.
pub fn log_json() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Strip trailing slashes so paths can be appended with a single `/`.
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}
