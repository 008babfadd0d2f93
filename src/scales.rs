// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Table-axis marker types.
//!
//! Each zero-sized type names one monotonic column of a
//! [`ConversionTable`](crate::ConversionTable) and knows how to read it from a
//! [`Sample`]. Conversions between axes are written with the markers as type
//! parameters, e.g. `table.convert::<Scet, Ls2>(scet)`.
//!
//! | Marker | Column | Unit | Origin |
//! |--------|--------|------|--------|
//! | [`Jdut`] | Julian Date, UT | days | JD 0.0 |
//! | [`Scet`] | seconds since the UNIX epoch | s | 1970-01-01T00:00:00 (JD 2 440 587.5) |
//! | [`Ls2`] | unwrapped solar longitude | deg | Ls = 0 at the start of Saturn year 1 |

use crate::sample::Sample;
use crate::table::ConversionTable;
use qtty::Days;

/// Julian Date of the UNIX epoch, 1970-01-01T00:00:00 UT.
pub const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

/// Marker trait for a strictly monotonic column of the conversion table.
pub trait Axis: Copy + Clone + std::fmt::Debug + PartialEq + 'static {
    /// Label used in error messages.
    const LABEL: &'static str;

    /// Value of this axis for one table row.
    fn of(sample: &Sample) -> f64;

    /// The whole column, one value per table row.
    fn column(table: &ConversionTable) -> &[f64];
}

/// Julian Date (UT).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Jdut;

impl Axis for Jdut {
    const LABEL: &'static str = "JDUT";

    #[inline(always)]
    fn of(sample: &Sample) -> f64 {
        sample.julian_date
    }

    #[inline(always)]
    fn column(table: &ConversionTable) -> &[f64] {
        &table.columns.julian_dates
    }
}

/// Spacecraft-event time: seconds since the UNIX epoch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scet;

impl Axis for Scet {
    const LABEL: &'static str = "SCET";

    #[inline(always)]
    fn of(sample: &Sample) -> f64 {
        sample.epoch_seconds
    }

    #[inline(always)]
    fn column(table: &ConversionTable) -> &[f64] {
        &table.columns.epoch_seconds
    }
}

/// Unwrapped solar longitude in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ls2;

impl Axis for Ls2 {
    const LABEL: &'static str = "Ls2";

    #[inline(always)]
    fn of(sample: &Sample) -> f64 {
        sample.ls2
    }

    #[inline(always)]
    fn column(table: &ConversionTable) -> &[f64] {
        &table.columns.ls2
    }
}
