// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Conversion table
//!
//! A [`ConversionTable`] is the ordered, validated set of rows every
//! conversion interpolates against. It is produced once by a
//! [`TableBuilder`] and never mutated afterwards; reloading means building
//! a new table (see [`SharedTable`](crate::SharedTable)).
//!
//! ## Construction
//!
//! ```text
//! raw samples ─► unwrap ─► light-time correction (optional)
//!             ─► merge anchors, forward-fill Saturn year
//!             ─► truncate to sample span, drop anchor rows
//!             ─► ls2 = ls + 360 (year − 1) ─► monotonicity check
//! ```
//!
//! Rows outside the anchored span get an extrapolated Saturn year (see
//! [`AnchorTable::extrapolate_year`]).
//!
//! ## Quick Example
//! ```rust
//! use saturn_ls::{RawSample, Scet, Ls2, TableBuilder, ANCHORS, SATURN_YEAR};
//!
//! let zero = ANCHORS[3].julian_date;
//! let samples: Vec<RawSample> = (0..60)
//!     .map(|d| {
//!         let jd = zero - 30.0 + d as f64;
//!         let ls = (360.0 * (jd - zero) / SATURN_YEAR.value()).rem_euclid(360.0);
//!         let instant = saturn_ls::julian_date_to_instant(jd).unwrap();
//!         RawSample { instant, julian_date: jd, ls, light_time: None }
//!     })
//!     .collect();
//!
//! let table = TableBuilder::new().build(&samples).unwrap();
//! let ls2 = table.convert::<Scet, Ls2>(table.rows()[45].epoch_seconds).unwrap();
//! assert_eq!(table.rows()[45].saturn_year, 3);
//! assert!(ls2 > 720.0);
//! ```

use crate::anchors::{AnchorPoint, AnchorTable, SATURN_YEAR};
use crate::error::{Result, SaturnLsError};
use crate::interp::{check_strictly_increasing, Interpolation, Interpolator};
use crate::light_time::correct_light_time;
use crate::sample::{RawSample, Sample, DEGREES_PER_YEAR};
use crate::scales::{Axis, Jdut, Ls2, Scet};
use crate::unwrap::{UnwrappedSample, Unwrapper, CROSSING_THRESHOLD, WRAP_THRESHOLD};
use qtty::Days;
use std::cmp::Ordering;
use std::path::Path;

/// When the builder applies the light-time correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightTimeMode {
    /// Correct only if every sample carries a light time.
    #[default]
    Auto,
    /// Always correct; samples without a light time are dropped.
    Apply,
    /// Never correct.
    Skip,
}

/// Builder and configuration for [`ConversionTable`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    anchors: AnchorTable,
    method: Interpolation,
    light_time: LightTimeMode,
    wrap_threshold: f64,
    crossing_threshold: f64,
    year_length: Days,
    window: Option<(f64, f64)>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            anchors: AnchorTable::default(),
            method: Interpolation::default(),
            light_time: LightTimeMode::default(),
            wrap_threshold: WRAP_THRESHOLD,
            crossing_threshold: CROSSING_THRESHOLD,
            year_length: SATURN_YEAR,
            window: None,
        }
    }
}

/// One entry of the merged anchor/sample sequence.
#[derive(Debug, Clone, Copy)]
enum Merged<'a> {
    Anchor(&'a AnchorPoint),
    Sample(UnwrappedSample),
}

impl Merged<'_> {
    fn julian_date(&self) -> f64 {
        match self {
            Merged::Anchor(a) => a.julian_date,
            Merged::Sample(s) => s.julian_date,
        }
    }

    /// Anchors sort before samples at the same date: they define the year
    /// at and after their instant.
    fn rank(&self) -> u8 {
        match self {
            Merged::Anchor(_) => 0,
            Merged::Sample(_) => 1,
        }
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the built-in Saturn-year anchors.
    pub fn anchors(mut self, anchors: AnchorTable) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn interpolation(mut self, method: Interpolation) -> Self {
        self.method = method;
        self
    }

    pub fn light_time(mut self, mode: LightTimeMode) -> Self {
        self.light_time = mode;
        self
    }

    /// Step, in degrees, above which consecutive samples count as a wrap.
    pub fn wrap_threshold(mut self, degrees: f64) -> Self {
        self.wrap_threshold = degrees;
        self
    }

    /// Raw Ls, in degrees, below which a sample marks a zero crossing.
    pub fn crossing_threshold(mut self, degrees: f64) -> Self {
        self.crossing_threshold = degrees;
        self
    }

    /// Saturn-year length used for year extrapolation outside the anchors.
    pub fn year_length(mut self, length: Days) -> Self {
        self.year_length = length;
        self
    }

    /// Keeps only rows with `start <= JDUT <= end`.
    pub fn window(mut self, start_julian_date: f64, end_julian_date: f64) -> Self {
        self.window = Some((start_julian_date, end_julian_date));
        self
    }

    /// Reads a reduced table file and builds from it.
    pub fn build_from_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<ConversionTable> {
        let samples = crate::table_io::read_samples_csv_path(path)?;
        self.build(&samples)
    }

    /// Reads a Horizons observer-table export and builds from it.
    pub fn build_from_horizons_path<P: AsRef<Path>>(&self, path: P) -> Result<ConversionTable> {
        let samples = crate::horizons::load_observer_table(path)?;
        self.build(&samples)
    }

    /// Builds a validated table from time-ordered raw samples.
    pub fn build(&self, samples: &[RawSample]) -> Result<ConversionTable> {
        if samples.len() < 2 {
            return Err(SaturnLsError::InsufficientSamples {
                found: samples.len(),
            });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(SaturnLsError::NonFiniteSample { index });
        }
        check_julian_dates(samples.iter().map(|s| s.julian_date))?;

        let unwrapped = Unwrapper::new(&self.anchors, self.year_length)
            .wrap_threshold(self.wrap_threshold)
            .crossing_threshold(self.crossing_threshold)
            .unwrap(samples)?;

        let apply_light_time = match self.light_time {
            LightTimeMode::Auto => samples.iter().all(|s| s.light_time.is_some()),
            LightTimeMode::Apply => true,
            LightTimeMode::Skip => false,
        };
        let mut corrected = if apply_light_time {
            correct_light_time(&unwrapped)?
        } else {
            unwrapped
        };
        if let Some((start, end)) = self.window {
            corrected.retain(|s| s.julian_date >= start && s.julian_date <= end);
        }
        let (Some(first), Some(last)) = (corrected.first(), corrected.last()) else {
            return Err(SaturnLsError::InsufficientSamples { found: 0 });
        };
        let span = (first.julian_date, last.julian_date);

        let mut merged: Vec<Merged<'_>> = self
            .anchors
            .points()
            .iter()
            .map(Merged::Anchor)
            .chain(corrected.iter().copied().map(Merged::Sample))
            .collect();
        merged.sort_by(|a, b| {
            a.julian_date()
                .partial_cmp(&b.julian_date())
                .unwrap_or(Ordering::Equal)
                .then(a.rank().cmp(&b.rank()))
        });

        let mut current_year: Option<i32> = None;
        let mut extrapolated = 0usize;
        let rows: Vec<Sample> = merged
            .into_iter()
            .filter_map(|entry| match entry {
                Merged::Anchor(anchor) => {
                    current_year = Some(anchor.saturn_year);
                    None
                }
                Merged::Sample(s) => {
                    let year = match current_year {
                        Some(year) if self.anchors.covers(s.julian_date) => year,
                        _ => {
                            extrapolated += 1;
                            self.anchors.extrapolate_year(s.julian_date, self.year_length)
                        }
                    };
                    Some((s, year))
                }
            })
            .filter(|(s, _)| s.julian_date >= span.0 && s.julian_date <= span.1)
            .map(|(s, year)| {
                let ls2 = s.ls + DEGREES_PER_YEAR * (year - 1) as f64;
                Sample::from_ls2(s.instant, s.julian_date, ls2)
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            anchors = self.anchors.points().len(),
            extrapolated,
            light_time = apply_light_time,
            "built conversion table"
        );
        ConversionTable::from_rows(rows, self.method, self.anchors.clone())
    }
}

fn check_julian_dates(values: impl Iterator<Item = f64>) -> Result<()> {
    let mut previous: Option<f64> = None;
    for (index, current) in values.enumerate() {
        if let Some(prev) = previous {
            if current == prev {
                return Err(SaturnLsError::DuplicateNode {
                    julian_date: current,
                });
            }
            if !(current > prev) {
                return Err(SaturnLsError::NonMonotonicTable {
                    axis: Jdut::LABEL,
                    index,
                    previous: prev,
                    current,
                });
            }
        }
        previous = Some(current);
    }
    Ok(())
}

/// Column-major copy of the monotonic axes, for interpolation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Columns {
    pub(crate) julian_dates: Vec<f64>,
    pub(crate) epoch_seconds: Vec<f64>,
    pub(crate) ls2: Vec<f64>,
}

/// Immutable, validated interpolation basis shared by all conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTable {
    rows: Vec<Sample>,
    pub(crate) columns: Columns,
    method: Interpolation,
    anchors: AnchorTable,
}

impl ConversionTable {
    /// Builds from a reduced table file with the default configuration.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        TableBuilder::default().build_from_csv_path(path)
    }

    /// Validates finished rows: at least two, finite, strictly increasing
    /// in JDUT, SCET and Ls2.
    fn from_rows(rows: Vec<Sample>, method: Interpolation, anchors: AnchorTable) -> Result<Self> {
        if rows.len() < 2 {
            return Err(SaturnLsError::InsufficientSamples { found: rows.len() });
        }
        if let Some(index) = rows.iter().position(|r| {
            !(r.julian_date.is_finite() && r.epoch_seconds.is_finite() && r.ls2.is_finite())
        }) {
            return Err(SaturnLsError::NonFiniteSample { index });
        }

        let columns = Columns {
            julian_dates: rows.iter().map(Jdut::of).collect(),
            epoch_seconds: rows.iter().map(Scet::of).collect(),
            ls2: rows.iter().map(Ls2::of).collect(),
        };
        check_julian_dates(columns.julian_dates.iter().copied())?;
        check_strictly_increasing(Scet::LABEL, &columns.epoch_seconds)?;
        check_strictly_increasing(Ls2::LABEL, &columns.ls2)?;

        Ok(Self {
            rows,
            columns,
            method,
            anchors,
        })
    }

    pub fn rows(&self) -> &[Sample] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`: a table holds at least two rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.method
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    /// A copy of this table interpolating with another method.
    pub fn with_interpolation(&self, method: Interpolation) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    /// Smallest and largest value of axis `A`.
    pub fn span<A: Axis>(&self) -> (f64, f64) {
        let column = A::column(self);
        (column[0], column[column.len() - 1])
    }

    /// Interpolator from axis `X` to axis `Y`.
    pub fn interpolator<X: Axis, Y: Axis>(&self) -> Interpolator<'_> {
        Interpolator::trusted(X::LABEL, X::column(self), Y::column(self), self.method)
    }

    /// Value on axis `Y` at `x` on axis `X`.
    ///
    /// ```text
    /// table.convert::<Scet, Ls2>(scet)
    /// ```
    #[inline]
    pub fn convert<X: Axis, Y: Axis>(&self, x: f64) -> Result<f64> {
        self.interpolator::<X, Y>().eval(x)
    }

    /// Order-preserving batch form of [`convert`](Self::convert); fails if
    /// any element is out of range.
    #[inline]
    pub fn convert_batch<X: Axis, Y: Axis>(&self, xs: &[f64]) -> Result<Vec<f64>> {
        self.interpolator::<X, Y>().eval_batch(xs)
    }
}
