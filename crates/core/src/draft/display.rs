use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Converts stored UTC timestamps into the string shown to clients.
pub trait TimeDisplay: Send + Sync {
    fn to_display(&self, utc: DateTime<Utc>) -> String;
}

/// Renders timestamps at a fixed UTC offset.
///
/// With no format string the output is RFC 3339.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use draftroom_core::draft::{OffsetTimeDisplay, TimeDisplay};
///
/// let display = OffsetTimeDisplay::from_offset_minutes(-300).unwrap();
/// let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// assert_eq!(display.to_display(t), "2024-01-01T07:00:00-05:00");
/// ```
#[derive(Debug, Clone)]
pub struct OffsetTimeDisplay {
    offset: FixedOffset,
    format: Option<String>,
}

impl OffsetTimeDisplay {
    pub fn new(offset: FixedOffset, format: Option<String>) -> Self {
        Self { offset, format }
    }

    /// RFC 3339 in UTC.
    pub fn utc() -> Self {
        Self::new(Utc.fix(), None)
    }

    /// Returns `None` if the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self::new(offset, None))
    }

    /// Uses a `chrono` strftime format instead of RFC 3339.
    ///
    /// Returns `None` if the format has an unknown or malformed specifier.
    pub fn with_format(mut self, format: impl Into<String>) -> Option<Self> {
        let format = format.into();
        if !is_valid_format(&format) {
            return None;
        }
        self.format = Some(format);
        Some(self)
    }
}

impl Default for OffsetTimeDisplay {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimeDisplay for OffsetTimeDisplay {
    fn to_display(&self, utc: DateTime<Utc>) -> String {
        let local = utc.with_timezone(&self.offset);
        let Some(format) = &self.format else {
            return local.to_rfc3339();
        };

        // Rendering reports bad specifiers as fmt::Error; `to_string` would panic on it.
        let mut out = String::new();
        match write!(out, "{}", local.format(format)) {
            Ok(()) => out,
            Err(_) => local.to_rfc3339(),
        }
    }
}

/// Returns true if every specifier in `format` is one chrono understands.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
