// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar instants and their arithmetic relation to SCET and Julian Date.
//!
//! Every instant handled by the crate is a zone-less
//! [`NaiveDateTime`] read as an absolute UT clock report. Values carrying a
//! zone are reduced with [`strip_zone`], which keeps the wall-clock reading
//! and discards the zone.
//!
//! Free-form strings go through [`parse_date_string`]. Strings without an
//! explicit zone are accepted on a best-effort basis and returned with a
//! [`DateCaveat`]; callers that need exact results should pass instants.

use crate::error::{Result, SaturnLsError};
use crate::scales::UNIX_EPOCH_JD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use qtty::*;

// ── SCET ──────────────────────────────────────────────────────────────────

/// Seconds since the UNIX epoch for a zone-less instant.
#[inline]
pub fn instant_to_epoch_seconds(instant: NaiveDateTime) -> f64 {
    let utc = instant.and_utc();
    utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 / 1e9
}

/// Zone-less instant for a count of seconds since the UNIX epoch.
///
/// The fractional part is rounded to the nearest nanosecond.
pub fn epoch_seconds_to_instant(scet: f64) -> Result<NaiveDateTime> {
    if !scet.is_finite() {
        return Err(SaturnLsError::UnrepresentableInstant(scet));
    }
    let mut secs = scet.floor();
    let mut nanos = ((scet - secs) * 1e9).round();
    if nanos >= 1e9 {
        secs += 1.0;
        nanos -= 1e9;
    }
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return Err(SaturnLsError::UnrepresentableInstant(scet));
    }
    DateTime::from_timestamp(secs as i64, nanos as u32)
        .map(|dt| dt.naive_utc())
        .ok_or(SaturnLsError::UnrepresentableInstant(scet))
}

/// Drops the zone of `datetime`, keeping its wall-clock reading.
#[inline]
pub fn strip_zone<Tz: TimeZone>(datetime: &DateTime<Tz>) -> NaiveDateTime {
    datetime.naive_local()
}

// ── Julian Date ───────────────────────────────────────────────────────────

/// Julian Date (UT) of an instant, by direct arithmetic from the UNIX epoch.
#[inline]
pub fn instant_to_julian_date(instant: NaiveDateTime) -> f64 {
    let since_epoch = Seconds::new(instant_to_epoch_seconds(instant));
    (UNIX_EPOCH_JD + since_epoch.to::<Day>()).value()
}

/// Instant of a Julian Date (UT), by direct arithmetic from the UNIX epoch.
pub fn julian_date_to_instant(julian_date: f64) -> Result<NaiveDateTime> {
    let since_epoch = (Days::new(julian_date) - UNIX_EPOCH_JD).to::<Second>();
    epoch_seconds_to_instant(since_epoch.value())
}

// ── Free-form date strings ────────────────────────────────────────────────

/// Reason a date-string conversion is only best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateCaveat {
    /// The string names no zone; it was read as UT, though its author may
    /// have meant local time.
    AmbiguousDateString(String),
}

impl std::fmt::Display for DateCaveat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousDateString(input) => {
                write!(f, "date string {input:?} has no zone and was read as UT")
            }
        }
    }
}

/// A value together with the caveat, if any, attached while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Caveated<T> {
    pub value: T,
    pub caveat: Option<DateCaveat>,
}

impl<T> Caveated<T> {
    /// A value computed without any caveat.
    pub fn exact(value: T) -> Self {
        Self {
            value,
            caveat: None,
        }
    }

    /// Whether no caveat was attached.
    pub fn is_exact(&self) -> bool {
        self.caveat.is_none()
    }

    /// Applies a fallible conversion to the value, keeping the caveat.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U>) -> Result<Caveated<U>> {
        Ok(Caveated {
            value: f(self.value)?,
            caveat: self.caveat,
        })
    }

    /// Applies a conversion to the value, keeping the caveat.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Caveated<U> {
        Caveated {
            value: f(self.value),
            caveat: self.caveat,
        }
    }
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%b-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%b-%d", "%Y/%m/%d"];

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses a free-form date/time string into a zone-less UT instant.
///
/// Strings with an explicit offset (RFC 3339, or a trailing `Z`/`UTC`) are
/// converted to UT and returned exact. Strings without a zone are read as
/// UT and carry [`DateCaveat::AmbiguousDateString`].
pub fn parse_date_string(input: &str) -> Result<Caveated<NaiveDateTime>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Caveated::exact(dt.naive_utc()));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Ok(Caveated::exact(dt.naive_utc()));
    }

    let zoned = s
        .strip_suffix("UTC")
        .or_else(|| s.strip_suffix('Z'))
        .map(str::trim_end);
    if let Some(instant) = zoned.and_then(parse_naive) {
        return Ok(Caveated::exact(instant));
    }

    let instant = parse_naive(s).ok_or_else(|| SaturnLsError::UnparseableDate(input.into()))?;
    let caveat = DateCaveat::AmbiguousDateString(input.into());
    tracing::warn!(%caveat, "date string conversion is best-effort");
    Ok(Caveated {
        value: instant,
        caveat: Some(caveat),
    })
}
