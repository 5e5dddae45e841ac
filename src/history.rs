//! History windows
//!
//! `minutes >= 0` lists essays written in the last `minutes` minutes.
//! `-1` is the archive: everything older than the recent window. Any other
//! value, including a missing or unparsable one, falls back to the recent
//! window.

use chrono::{DateTime, Duration, Utc};

/// Default and archive boundary, in minutes
pub const RECENT_WINDOW_MINUTES: i64 = 60;

/// Query value selecting the archive
pub const ARCHIVE_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Essays with `timestamp >= now - minutes`
    Since { minutes: i64 },
    /// Essays with `timestamp < now - RECENT_WINDOW_MINUTES`
    Archive,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::Since {
            minutes: RECENT_WINDOW_MINUTES,
        }
    }
}

impl HistoryWindow {
    pub fn from_minutes(minutes: i64) -> Self {
        match minutes {
            ARCHIVE_SENTINEL => Self::Archive,
            m if m >= 0 => Self::Since { minutes: m },
            _ => Self::default(),
        }
    }

    /// Parse the raw `minutes` query parameter
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map(Self::from_minutes)
            .unwrap_or_default()
    }

    /// Value echoed back to clients as the active selection
    pub fn selected_minutes(&self) -> i64 {
        match self {
            Self::Since { minutes } => *minutes,
            Self::Archive => ARCHIVE_SENTINEL,
        }
    }

    /// Boundary instant of the window relative to `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let minutes = match self {
            Self::Since { minutes } => *minutes,
            Self::Archive => RECENT_WINDOW_MINUTES,
        };

        Duration::try_minutes(minutes)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
