// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for table construction and conversion queries.
//!
//! | Variant | Raised by | Recoverable? |
//! |---------|-----------|--------------|
//! | [`OutOfRange`](SaturnLsError::OutOfRange) | any table-backed conversion | Yes |
//! | [`InsufficientAnchorData`](SaturnLsError::InsufficientAnchorData) | unwrapping | No |
//! | [`NonMonotonicTable`](SaturnLsError::NonMonotonicTable) | table validation | No |
//! | [`DuplicateNode`](SaturnLsError::DuplicateNode) | table validation | No |
//! | [`InsufficientSamples`](SaturnLsError::InsufficientSamples) | table / interpolator construction | No |
//! | [`NonFiniteSample`](SaturnLsError::NonFiniteSample) | table construction | No |
//! | [`UnparseableDate`](SaturnLsError::UnparseableDate) | date-string parsing | Yes |
//! | [`Io`](SaturnLsError::Io), [`Csv`](SaturnLsError::Csv), [`Ephemeris`](SaturnLsError::Ephemeris) | table sources | No |
//!
//! An ambiguous date string is not an error: see [`DateCaveat`](crate::DateCaveat).

use thiserror::Error;

/// Unified error type of the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SaturnLsError {
    /// A query fell outside the span of the conversion table.
    #[error("{axis} value {value} outside of table range [{min}, {max}]")]
    OutOfRange {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No zero crossing of Ls was found, so the 360° offset cannot be anchored.
    #[error("samples contain no Ls zero crossing; cannot anchor the Saturn-year offset")]
    InsufficientAnchorData,

    /// A column of the built table is not strictly increasing.
    #[error("{axis} is not strictly increasing at row {index}: {previous} then {current}")]
    NonMonotonicTable {
        axis: &'static str,
        index: usize,
        previous: f64,
        current: f64,
    },

    /// Two rows share the same Julian Date.
    #[error("duplicate interpolation node at JDUT {julian_date}")]
    DuplicateNode { julian_date: f64 },

    /// Fewer rows than interpolation needs.
    #[error("at least 2 samples are required, found {found}")]
    InsufficientSamples { found: usize },

    /// A sample carries a NaN or infinite value.
    #[error("sample {index} has a non-finite value")]
    NonFiniteSample { index: usize },

    /// Seconds since the UNIX epoch that no calendar instant can represent.
    #[error("SCET {0} s is not representable as a calendar instant")]
    UnrepresentableInstant(f64),

    /// A date string matched none of the accepted formats.
    #[error("unable to parse date string {0:?}")]
    UnparseableDate(String),

    #[error("unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("table file error: {0}")]
    Csv(#[from] csv::Error),

    /// Raw provider output lacks the expected structure or values.
    #[error("ephemeris parse error: {0}")]
    Ephemeris(String),
}

/// Convenience alias for `Result<T, SaturnLsError>`.
pub type Result<T> = std::result::Result<T, SaturnLsError>;
