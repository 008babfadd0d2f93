// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ephemeris samples, raw and tabulated.

use crate::instant::{instant_to_epoch_seconds, instant_to_julian_date};
use chrono::NaiveDateTime;
use qtty::Seconds;

/// Degrees in one Saturn year of unwrapped longitude.
pub const DEGREES_PER_YEAR: f64 = 360.0;

/// One ephemeris observation as supplied by a table source.
///
/// Sources must deliver samples in ascending time order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Absolute, zone-less UT instant.
    pub instant: NaiveDateTime,
    /// Julian Date (UT) of `instant`.
    pub julian_date: f64,
    /// Instantaneous solar longitude, nominally in `[0, 360)`.
    pub ls: f64,
    /// One-way light time from Saturn to the observer, if the source reports it.
    pub light_time: Option<Seconds>,
}

impl RawSample {
    /// A sample whose Julian Date is derived from its instant.
    pub fn new(instant: NaiveDateTime, ls: f64) -> Self {
        Self {
            instant,
            julian_date: instant_to_julian_date(instant),
            ls,
            light_time: None,
        }
    }

    /// Attaches a one-way light time.
    pub fn with_light_time(mut self, light_time: Seconds) -> Self {
        self.light_time = Some(light_time);
        self
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.julian_date.is_finite()
            && self.ls.is_finite()
            && self.light_time.map_or(true, |lt| lt.value().is_finite())
    }
}

/// One row of a [`ConversionTable`](crate::ConversionTable).
///
/// `ls2 = ls + 360 × (saturn_year − 1)` holds for every row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    pub instant: NaiveDateTime,
    pub julian_date: f64,
    pub epoch_seconds: f64,
    pub ls: f64,
    pub ls2: f64,
    pub saturn_year: i32,
}

impl Sample {
    /// Builds a row from its instant, Julian Date and unwrapped longitude.
    pub(crate) fn from_ls2(instant: NaiveDateTime, julian_date: f64, ls2: f64) -> Self {
        let SaturnLongitude { saturn_year, ls } = SaturnLongitude::from_ls2(ls2);
        Self {
            instant,
            julian_date,
            epoch_seconds: instant_to_epoch_seconds(instant),
            ls,
            ls2,
            saturn_year,
        }
    }
}

/// A Saturn year together with the solar longitude within that year.
///
/// Year and longitude are always passed by name, never as a positional pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaturnLongitude {
    pub saturn_year: i32,
    /// Degrees in `[0, 360)`.
    pub ls: f64,
}

impl SaturnLongitude {
    pub const fn new(saturn_year: i32, ls: f64) -> Self {
        Self { saturn_year, ls }
    }

    /// Splits an unwrapped longitude: `year = floor(ls2 / 360) + 1`.
    ///
    /// `ls` is always in `[0, 360)`. Years beyond the `i32` range saturate.
    pub fn from_ls2(ls2: f64) -> Self {
        let mut ls = ls2.rem_euclid(DEGREES_PER_YEAR);
        // A tiny negative ls2 rounds up to exactly 360.
        if ls >= DEGREES_PER_YEAR {
            ls -= DEGREES_PER_YEAR;
        }
        let cycles = ((ls2 - ls) / DEGREES_PER_YEAR).round();
        // `as` clamps to the i32 range.
        let saturn_year = (cycles + 1.0) as i32;
        Self { saturn_year, ls }
    }

    /// Unwrapped longitude: `ls2 = 360 × (year − 1) + ls`.
    pub fn ls2(&self) -> f64 {
        DEGREES_PER_YEAR * (f64::from(self.saturn_year) - 1.0) + self.ls
    }
}

impl std::fmt::Display for SaturnLongitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SY {} Ls {:.4}°", self.saturn_year, self.ls)
    }
}
