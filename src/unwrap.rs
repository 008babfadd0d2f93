// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Removal of the 360° periodicity of raw Ls samples.
//!
//! The raw longitude wraps from ≈360° back to ≈0° once per Saturn year. The
//! [`Unwrapper`] scans the time-ordered samples once and keeps a running
//! multiple of 360° so that the resulting `ls2` is continuous:
//!
//! 1. The first sample with `ls` below the crossing threshold (1°) marks a
//!    true zero crossing. The Saturn year beginning there is read from the
//!    nearest anchor; earlier samples belong to the previous year.
//! 2. Any step between consecutive unwrapped values larger than the wrap
//!    threshold (300°) in magnitude shifts that sample and all later ones by
//!    360° against the direction of the step.
//!
//! Day-to-day motion of Saturn's Ls is a small fraction of a degree, so the
//! threshold separates a wrap from ordinary motion and sampling noise.

use crate::anchors::AnchorTable;
use crate::error::{Result, SaturnLsError};
use crate::sample::{RawSample, DEGREES_PER_YEAR};
use chrono::NaiveDateTime;
use qtty::{Days, Seconds, Simplify};

/// Step between consecutive samples treated as a wrap, in degrees.
pub const WRAP_THRESHOLD: f64 = 300.0;

/// Raw longitudes below this value, in degrees, mark a zero crossing.
pub const CROSSING_THRESHOLD: f64 = 1.0;

/// A raw sample together with its unwrapped longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnwrappedSample {
    pub instant: NaiveDateTime,
    pub julian_date: f64,
    pub ls: f64,
    pub ls2: f64,
    pub light_time: Option<Seconds>,
}

/// Converts time-ordered raw samples into continuous unwrapped longitudes.
#[derive(Debug, Clone, Copy)]
pub struct Unwrapper<'a> {
    anchors: &'a AnchorTable,
    year_length: Days,
    wrap_threshold: f64,
    crossing_threshold: f64,
}

impl<'a> Unwrapper<'a> {
    pub fn new(anchors: &'a AnchorTable, year_length: Days) -> Self {
        Self {
            anchors,
            year_length,
            wrap_threshold: WRAP_THRESHOLD,
            crossing_threshold: CROSSING_THRESHOLD,
        }
    }

    pub fn wrap_threshold(mut self, degrees: f64) -> Self {
        self.wrap_threshold = degrees;
        self
    }

    pub fn crossing_threshold(mut self, degrees: f64) -> Self {
        self.crossing_threshold = degrees;
        self
    }

    /// Saturn year starting at a zero crossing observed at `julian_date`.
    fn crossing_year(&self, julian_date: f64) -> i32 {
        let anchor = self.anchors.nearest(julian_date);
        let elapsed = Days::new(julian_date - anchor.julian_date);
        let cycles = (elapsed / self.year_length).simplify().value().round();
        anchor.saturn_year + cycles as i32
    }

    /// Unwraps `samples`, which must be in ascending time order.
    ///
    /// Fails with [`SaturnLsError::InsufficientAnchorData`] when no sample
    /// lies below the crossing threshold.
    pub fn unwrap(&self, samples: &[RawSample]) -> Result<Vec<UnwrappedSample>> {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(SaturnLsError::NonFiniteSample { index });
        }
        let crossing = samples
            .iter()
            .position(|s| s.ls < self.crossing_threshold)
            .ok_or(SaturnLsError::InsufficientAnchorData)?;

        let year = self.crossing_year(samples[crossing].julian_date);
        let after = DEGREES_PER_YEAR * (year - 1) as f64;
        let before = after - DEGREES_PER_YEAR;

        let mut shift = 0.0;
        let mut wraps = 0usize;
        let mut previous: Option<f64> = None;
        let unwrapped = samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let base = if i < crossing { before } else { after };
                let mut ls2 = s.ls + base + shift;
                if let Some(prev) = previous {
                    let step = ls2 - prev;
                    if step.abs() > self.wrap_threshold {
                        let correction = -DEGREES_PER_YEAR * step.signum();
                        shift += correction;
                        ls2 += correction;
                        wraps += 1;
                    }
                }
                previous = Some(ls2);
                UnwrappedSample {
                    instant: s.instant,
                    julian_date: s.julian_date,
                    ls: s.ls,
                    ls2,
                    light_time: s.light_time,
                }
            })
            .collect();

        tracing::debug!(
            samples = samples.len(),
            crossing,
            saturn_year = year,
            wraps,
            "unwrapped solar longitudes"
        );
        Ok(unwrapped)
    }
}
