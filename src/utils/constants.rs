/// SPR admin API endpoints and dashboard constants

/// Default base URL of the SPR admin API
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Status endpoints polled by the dashboard
pub const UPTIME_ENDPOINT: &str = "/info/uptime";
pub const DOCKER_ENDPOINT: &str = "/info/docker";
pub const HOSTNAME_ENDPOINT: &str = "/info/hostname";
pub const VERSION_ENDPOINT: &str = "/version";

/// All four status resources are re-fetched on this period
pub const POLL_INTERVAL_MS: u64 = 5_000;

/// Per-request timeout for the admin API
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Row order for the time/uptime/users list
pub const UPTIME_KEYS: &[&str] = &["time", "uptime", "users"];

/// Row order for the load-average list
pub const LOAD_KEYS: &[&str] = &["load_1m", "load_5m", "load_15m"];
