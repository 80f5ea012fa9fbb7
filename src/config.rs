//! Configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Unset or unparsable numeric/boolean values fall back to
//! defaults; an unknown `LOG_FORMAT` or an out-of-range
//! `CHANGE_BUS_CAPACITY` is an error.

use crate::domain::change_bus::{DEFAULT_CAPACITY, MAX_CAPACITY};

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Per-topic buffer capacity of the change bus.
    pub change_bus_capacity: usize,

    /// Whether to load the demo accounts, posts, and comments at startup.
    pub seed_demo_data: bool,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            change_bus_capacity: DEFAULT_CAPACITY,
            seed_demo_data: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` is set to something other than
    /// `pretty` or `json`, or if `CHANGE_BUS_CAPACITY` is outside
    /// `1..=MAX_CAPACITY`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` is set to something other than
    /// `pretty` or `json`, or if `CHANGE_BUS_CAPACITY` is outside
    /// `1..=MAX_CAPACITY`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let change_bus_capacity = parse_or(&lookup, "CHANGE_BUS_CAPACITY", DEFAULT_CAPACITY);
        if !(1..=MAX_CAPACITY).contains(&change_bus_capacity) {
            anyhow::bail!(
                "CHANGE_BUS_CAPACITY must be between 1 and {MAX_CAPACITY}, got {change_bus_capacity}"
            );
        }
        let seed_demo_data = parse_bool_or(&lookup, "SEED_DEMO_DATA", false);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("unsupported LOG_FORMAT: {other}"),
        };

        Ok(Self {
            change_bus_capacity,
            seed_demo_data,
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
