//! Global constants for omada-monitor
//!
//! Centralized location for application-wide constants

/// Application subsystem identifier for macOS Unified Logging System
pub const APP_SUBSYSTEM: &str = "com.wlan1.omadamonitor";

/// Name of the per-user storage directory created under the home directory
pub const STORAGE_DIR_NAME: &str = ".omada-monitor";

/// Environment variable overriding the storage directory
pub const STORAGE_DIR_ENV: &str = "OMADA_MONITOR_HOME";

/// Raw key file inside the storage directory
pub const KEY_FILE_NAME: &str = "key";

/// Encrypted credential blob inside the storage directory
pub const CREDENTIALS_FILE_NAME: &str = "credentials.enc";

/// Optional TOML settings file inside the storage directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Placeholder shown for absent or unparsable fields
pub const SENTINEL: &str = "--";

/// Default site name offered by the login prompt
pub const DEFAULT_SITE: &str = "Default";

/// Default refresh period in seconds
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Bounds for the refresh period (seconds)
pub const REFRESH_SECS_MIN: u64 = 1;
pub const REFRESH_SECS_MAX: u64 = 3600;

/// Default cap on interactive login attempts
pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;

/// Bounds for the interactive login attempt cap
pub const LOGIN_ATTEMPTS_MIN: u32 = 1;
pub const LOGIN_ATTEMPTS_MAX: u32 = 10;

/// Permission bits for the storage directory
pub const DIR_MODE: u32 = 0o700;

/// Permission bits for the key and credential files
pub const FILE_MODE: u32 = 0o600;
