// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Saturn-year anchors
//!
//! High-precision instants at which Saturn's apparent solar longitude
//! crosses 0°, one per Saturn-year boundary. They are determined
//! independently of any sample table and are used to
//!
//! * assign the Saturn-year index of table rows (forward fill from the
//!   nearest preceding anchor), and
//! * estimate the year index of rows outside the anchored span, by
//!   extrapolating from the nearest anchor with a fixed year length.
//!
//! Saturn year 1 begins at the 1950-09-21 crossing.

use crate::error::{Result, SaturnLsError};
use crate::instant::instant_to_julian_date;
use chrono::NaiveDateTime;
use qtty::{Days, Simplify};

/// Mean spacing of the built-in anchors (≈ 29.45 Julian years).
pub const SATURN_YEAR: Days = Days::new(10_755.018);

/// Format of [`AnchorPoint::date`].
const ANCHOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Start of one Saturn year.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnchorPoint {
    pub saturn_year: i32,
    /// UT calendar instant of the crossing.
    pub date: &'static str,
    /// Julian Date (UT) of the crossing.
    pub julian_date: f64,
}

impl AnchorPoint {
    pub const fn new(saturn_year: i32, date: &'static str, julian_date: f64) -> Self {
        Self {
            saturn_year,
            date,
            julian_date,
        }
    }

    /// The crossing as a zone-less instant.
    pub fn instant(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.date, ANCHOR_DATE_FORMAT)
            .map_err(|_| SaturnLsError::UnparseableDate(self.date.into()))
    }

    /// Julian Date recomputed from [`date`](Self::date).
    pub fn instant_julian_date(&self) -> Result<f64> {
        self.instant().map(instant_to_julian_date)
    }
}

/// Built-in Saturn-year boundaries, SY 0 through SY 8.
#[rustfmt::skip]
pub const ANCHORS: [AnchorPoint; 9] = [
    AnchorPoint::new(0, "1921-04-12 00:26:26.287291050", 2_422_791.518_359_806_4),
    AnchorPoint::new(1, "1950-09-21 19:02:40.934177041", 2_433_546.293_529_330_8),
    AnchorPoint::new(2, "1980-03-03 16:12:48.102177799", 2_444_302.175_556_738),
    AnchorPoint::new(3, "2009-08-11 02:04:25.416794062", 2_455_054.586_405_287),
    AnchorPoint::new(4, "2039-01-22 19:51:58.221873760", 2_465_811.327_757_197_4),
    AnchorPoint::new(5, "2068-06-29 08:45:59.446648121", 2_476_561.865_271_373),
    AnchorPoint::new(6, "2097-12-13 07:54:51.884071350", 2_487_320.829_767_177),
    AnchorPoint::new(7, "2127-05-21 00:44:15.628328323", 2_498_070.530_736_439),
    AnchorPoint::new(8, "2156-11-05 03:53:00.718159676", 2_508_831.661_813_867_7),
];

/// Ordered set of anchors used to assign Saturn years.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTable {
    points: Vec<AnchorPoint>,
}

impl Default for AnchorTable {
    fn default() -> Self {
        Self {
            points: ANCHORS.to_vec(),
        }
    }
}

impl AnchorTable {
    /// Validates a custom anchor set.
    ///
    /// Anchors must be non-empty, strictly increasing in Julian Date, and
    /// numbered with consecutive Saturn years.
    pub fn new(points: Vec<AnchorPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(SaturnLsError::InsufficientAnchorData);
        }
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].julian_date <= pair[0].julian_date {
                return Err(SaturnLsError::NonMonotonicTable {
                    axis: "anchor JDUT",
                    index: index + 1,
                    previous: pair[0].julian_date,
                    current: pair[1].julian_date,
                });
            }
            if pair[1].saturn_year != pair[0].saturn_year + 1 {
                return Err(SaturnLsError::NonMonotonicTable {
                    axis: "anchor Saturn year",
                    index: index + 1,
                    previous: pair[0].saturn_year as f64,
                    current: pair[1].saturn_year as f64,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[AnchorPoint] {
        &self.points
    }

    pub fn first(&self) -> &AnchorPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &AnchorPoint {
        &self.points[self.points.len() - 1]
    }

    /// Anchor of a given Saturn year, if tabulated.
    pub fn get(&self, saturn_year: i32) -> Option<&AnchorPoint> {
        let offset = saturn_year.checked_sub(self.first().saturn_year)?;
        self.points.get(usize::try_from(offset).ok()?)
    }

    /// Whether `julian_date` lies between the first and the last anchor.
    pub fn covers(&self, julian_date: f64) -> bool {
        julian_date >= self.first().julian_date && julian_date <= self.last().julian_date
    }

    /// Anchor closest in time to `julian_date`.
    pub fn nearest(&self, julian_date: f64) -> &AnchorPoint {
        let idx = self.points.partition_point(|a| a.julian_date < julian_date);
        match (idx.checked_sub(1), self.points.get(idx)) {
            (Some(before), Some(after)) => {
                let before = &self.points[before];
                if julian_date - before.julian_date <= after.julian_date - julian_date {
                    before
                } else {
                    after
                }
            }
            (Some(before), None) => &self.points[before],
            (None, _) => self.first(),
        }
    }

    /// Saturn year of `julian_date` from the last anchor at or before it.
    ///
    /// Returns `None` before the first anchor.
    pub fn forward_fill(&self, julian_date: f64) -> Option<i32> {
        let idx = self.points.partition_point(|a| a.julian_date <= julian_date);
        idx.checked_sub(1).map(|i| self.points[i].saturn_year)
    }

    /// Saturn year estimated from the nearest anchor and a fixed year length.
    ///
    /// `year = anchor.year + floor((jd − anchor.jd) / year_length)`. This is
    /// not crossing-accurate far from the anchor; a wider anchor set is the
    /// remedy.
    pub fn extrapolate_year(&self, julian_date: f64, year_length: Days) -> i32 {
        let reference = self.nearest(julian_date);
        let elapsed = Days::new(julian_date - reference.julian_date);
        let cycles = (elapsed / year_length).simplify().value().floor();
        reference.saturn_year + cycles as i32
    }

    /// Saturn year of `julian_date`: forward fill inside the anchored span,
    /// extrapolation outside it.
    pub fn saturn_year(&self, julian_date: f64, year_length: Days) -> i32 {
        if self.covers(julian_date) {
            if let Some(year) = self.forward_fill(julian_date) {
                return year;
            }
        }
        self.extrapolate_year(julian_date, year_length)
    }
}
