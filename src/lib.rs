// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Saturn solar longitude
//!
//! Conversion between calendar instants, spacecraft-event time (SCET, seconds
//! since the UNIX epoch), Julian Dates, and Saturn's solar longitude expressed
//! either as an unwrapped angle ([`Ls2`]) or as a Saturn year plus in-year Ls
//! ([`SaturnLongitude`]).
//!
//! # Core types
//!
//! - [`RawSample`]: one ephemeris sample `{instant, JDUT, Ls, light time}`.
//! - [`TableBuilder`]: turns raw samples into a validated [`ConversionTable`].
//! - [`ConversionTable`]: immutable rows, strictly increasing in JDUT, SCET
//!   and Ls2; queried as `table.convert::<X, Y>(x)` with [`Axis`] markers.
//! - [`Converter`]: named conversions over a shared table.
//! - [`SharedTable`]: a table reference that can be swapped atomically.
//! - [`AnchorTable`]: Saturn-year boundary instants, [`ANCHORS`] by default.
//!
//! # Axes
//!
//! | Marker | Column |
//! |--------|--------|
//! | [`Jdut`] | Julian Date, UT |
//! | [`Scet`] | seconds since 1970-01-01T00:00:00 |
//! | [`Ls2`] | unwrapped solar longitude, `360 × (year − 1) + Ls` |
//!
//! # Table sources
//!
//! - [`table_io`]: the reduced `date,JDUT,Ls` file.
//! - [`horizons`]: JPL Horizons observer-table exports.
//!
//! Every table-backed query outside the table span fails with
//! [`SaturnLsError::OutOfRange`]; nothing extrapolates silently.
//!
//! ```rust,no_run
//! use saturn_ls::{Converter, ConversionTable, SaturnLongitude};
//!
//! let table = ConversionTable::from_csv_path("saturn-Ls.csv")?;
//! let conv = Converter::from(table);
//! let start_of_sy3 = conv.sy_ls_to_instant(SaturnLongitude::new(3, 0.0))?;
//! println!("Saturn year 3 began at {start_of_sy3}");
//! # Ok::<(), saturn_ls::SaturnLsError>(())
//! ```

mod anchors;
mod convert;
mod error;
pub mod horizons;
pub(crate) mod instant;
mod interp;
mod light_time;
mod sample;
pub(crate) mod scales;
mod table;
pub mod table_io;
mod unwrap;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use anchors::{AnchorPoint, AnchorTable, ANCHORS, SATURN_YEAR};
pub use convert::{
    instant_to_scet, ls2_to_ls, ls2_to_sy_ls, scet_to_instant, sy_ls_to_ls2, Converter,
    SharedTable,
};
pub use error::{Result, SaturnLsError};
pub use instant::{
    instant_to_julian_date, julian_date_to_instant, parse_date_string, strip_zone, Caveated,
    DateCaveat,
};
pub use interp::{Interpolation, Interpolator};
pub use light_time::correct_light_time;
pub use sample::{RawSample, Sample, SaturnLongitude, DEGREES_PER_YEAR};
pub use scales::{Axis, Jdut, Ls2, Scet, UNIX_EPOCH_JD};
pub use table::{ConversionTable, LightTimeMode, TableBuilder};
pub use unwrap::{UnwrappedSample, Unwrapper, CROSSING_THRESHOLD, WRAP_THRESHOLD};
