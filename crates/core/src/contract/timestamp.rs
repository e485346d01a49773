//! Microsecond-precision timestamp type
//!
//! Both time axes of the store are expressed with this type:
//! - **valid time**: when a fact was true in the modeled world
//! - **transaction time**: when the store recorded the fact
//!
//! ## Precision
//!
//! Timestamps are microseconds since Unix epoch (1970-01-01 00:00:00 UTC),
//! stored as `u64`. The zero timestamp is the epoch itself.
//!
//! ## Usage
//!
//! ```
//! use vellum_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let t = Timestamp::from_secs(1000);
//! let parsed = Timestamp::parse_rfc3339("2020-01-01T00:00:00Z").unwrap();
//! assert!(parsed < now);
//! assert_eq!(t.as_micros(), 1_000_000_000);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microsecond-precision point on either time axis.
///
/// ## Invariants
///
/// - Always non-negative (u64 microseconds)
/// - Totally ordered and hashable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Current wall-clock time.
    ///
    /// Returns the epoch if the system clock reports a time before it.
    pub fn now() -> Self {
        let since = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(since.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis.saturating_mul(1_000))
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Convert from a chrono UTC datetime.
    ///
    /// Datetimes before the epoch clamp to [`Timestamp::EPOCH`].
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let micros = dt.timestamp_micros();
        Timestamp(u64::try_from(micros).unwrap_or(0))
    }

    /// Parse an RFC 3339 string such as `2021-04-01T12:00:00Z`.
    pub fn parse_rfc3339(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Milliseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Convert to a chrono UTC datetime.
    ///
    /// Returns `None` for values chrono cannot represent.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let micros = i64::try_from(self.0).ok()?;
        Utc.timestamp_micros(micros).single()
    }

    /// Add a duration, saturating at [`Timestamp::MAX`].
    pub fn saturating_add(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_add(duration.as_micros() as u64))
    }

    /// Subtract a duration, saturating at [`Timestamp::EPOCH`].
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_sub(duration.as_micros() as u64))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
            None => write!(f, "{}us", self.0),
        }
    }
}

impl From<u64> for Timestamp {
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(dt)
    }
}
