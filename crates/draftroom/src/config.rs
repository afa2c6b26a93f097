use std::{collections::BTreeMap, env, time::Duration};

use draftroom_core::draft::{OffsetTimeDisplay, UserId};
use draftroom_core::identity::StaticUserDirectory;

/// Default lifetime of a cached draft, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "draftroom.db")
    pub sqlite_path: String,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Cache TTL in seconds (default: 300). `None` keeps entries until invalidated.
    ///
    /// A finite TTL bounds how long a reader that raced a writer can keep a
    /// stale copy cached.
    pub cache_ttl_seconds: Option<u64>,
    /// Redis connection URL. Only used when the `redis` feature is enabled;
    /// unset falls back to the in-memory cache.
    pub redis_url: Option<String>,
    /// Offset from UTC for displayed timestamps, in minutes (default: 0)
    pub display_utc_offset_minutes: i32,
    /// strftime format for displayed timestamps (default: RFC 3339)
    pub display_time_format: Option<String>,
    /// Commissioner display names by user id (default: none)
    pub commish_names: BTreeMap<i64, String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "draftroom.db")
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300, `0` disables expiry)
    /// - `REDIS_URL` - Redis connection URL (default: none)
    /// - `DISPLAY_UTC_OFFSET_MINUTES` - Display offset from UTC (default: 0)
    /// - `DISPLAY_TIME_FORMAT` - Display time format (default: RFC 3339)
    /// - `COMMISH_NAMES` - Display names as `id=name` pairs, comma separated
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    ///
    /// Unparseable numbers fall back to their defaults; empty strings count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            sqlite_path: var("SQLITE_PATH").unwrap_or_else(|| "draftroom.db".to_string()),
            cache_max_entries: var("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_ttl_seconds: match var("CACHE_TTL_SECONDS").and_then(|v| v.parse().ok()) {
                Some(0) => None,
                Some(secs) => Some(secs),
                None => Some(DEFAULT_CACHE_TTL_SECONDS),
            },
            redis_url: var("REDIS_URL"),
            display_utc_offset_minutes: var("DISPLAY_UTC_OFFSET_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            display_time_format: var("DISPLAY_TIME_FORMAT"),
            commish_names: var("COMMISH_NAMES")
                .map(|v| parse_names(&v))
                .unwrap_or_default(),
        }
    }

    /// Builds the user directory from `commish_names`.
    pub fn user_directory(&self) -> StaticUserDirectory {
        self.commish_names
            .iter()
            .fold(StaticUserDirectory::new(), |directory, (id, name)| {
                directory.with_user(UserId(*id), name.clone())
            })
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_seconds.map(Duration::from_secs)
    }

    /// Builds the timestamp converter.
    ///
    /// An out-of-range offset falls back to UTC and an invalid format to RFC 3339.
    pub fn time_display(&self) -> OffsetTimeDisplay {
        let display = OffsetTimeDisplay::from_offset_minutes(self.display_utc_offset_minutes)
            .unwrap_or_else(|| {
                tracing::warn!(
                    offset_minutes = self.display_utc_offset_minutes,
                    "Display offset out of range, using UTC"
                );
                OffsetTimeDisplay::utc()
            });

        let Some(format) = &self.display_time_format else {
            return display;
        };
        match display.clone().with_format(format.clone()) {
            Some(formatted) => formatted,
            None => {
                tracing::warn!(format = %format, "Invalid display time format, using RFC 3339");
                display
            }
        }
    }
}

/// Parses `1=Jordan,2=Sam`. Malformed pairs are skipped.
fn parse_names(value: &str) -> BTreeMap<i64, String> {
    value
        .split(',')
        .filter_map(|pair| {
            let (id, name) = pair.split_once('=')?;
            let name = name.trim();
            match id.trim().parse() {
                Ok(id) if !name.is_empty() => Some((id, name.to_string())),
                _ => {
                    tracing::warn!(entry = pair, "Ignoring malformed COMMISH_NAMES entry");
                    None
                }
            }
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
