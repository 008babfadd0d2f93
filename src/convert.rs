// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Conversions between calendar instants, SCET, Julian Date and Saturn
//! solar longitude.
//!
//! Two kinds of conversion live here:
//!
//! - **Pure arithmetic**, always defined for finite input:
//!   [`ls2_to_sy_ls`], [`sy_ls_to_ls2`], [`ls2_to_ls`],
//!   [`instant_to_scet`], [`scet_to_instant`].
//! - **Table-backed**, on a [`Converter`]: every query is range-checked
//!   against the table and fails with
//!   [`OutOfRange`](crate::SaturnLsError::OutOfRange) instead of
//!   extrapolating. Each scalar method has a `_batch` counterpart that keeps
//!   the input order and fails if any element is out of range.
//!
//! A [`SharedTable`] lets long-lived readers swap to a freshly built table
//! without ever seeing a partially built one.

use crate::error::Result;
use crate::instant::{
    epoch_seconds_to_instant, instant_to_epoch_seconds, parse_date_string, Caveated,
};
use crate::sample::SaturnLongitude;
use crate::scales::{Jdut, Ls2, Scet};
use crate::table::ConversionTable;
use chrono::NaiveDateTime;
use std::sync::{Arc, PoisonError, RwLock};

// ── Pure arithmetic ───────────────────────────────────────────────────────

/// Splits an unwrapped longitude into Saturn year and in-year Ls.
#[inline]
pub fn ls2_to_sy_ls(ls2: f64) -> SaturnLongitude {
    SaturnLongitude::from_ls2(ls2)
}

/// Unwrapped longitude of a Saturn year and in-year Ls.
#[inline]
pub fn sy_ls_to_ls2(longitude: SaturnLongitude) -> f64 {
    longitude.ls2()
}

/// In-year Ls, in `[0, 360)`; the `ls` of [`ls2_to_sy_ls`].
#[inline]
pub fn ls2_to_ls(ls2: f64) -> f64 {
    SaturnLongitude::from_ls2(ls2).ls
}

/// Seconds since the UNIX epoch of a zone-less instant.
#[inline]
pub fn instant_to_scet(instant: NaiveDateTime) -> f64 {
    instant_to_epoch_seconds(instant)
}

/// Zone-less instant of a SCET value.
#[inline]
pub fn scet_to_instant(scet: f64) -> Result<NaiveDateTime> {
    epoch_seconds_to_instant(scet)
}

// ── Table-backed conversions ──────────────────────────────────────────────

/// Conversion front end over one immutable table.
///
/// Cloning is cheap; clones share the table.
#[derive(Debug, Clone)]
pub struct Converter {
    table: Arc<ConversionTable>,
}

impl From<ConversionTable> for Converter {
    fn from(table: ConversionTable) -> Self {
        Self::new(Arc::new(table))
    }
}

impl Converter {
    pub fn new(table: Arc<ConversionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    pub fn scet_to_ls2(&self, scet: f64) -> Result<f64> {
        self.table.convert::<Scet, Ls2>(scet)
    }

    pub fn scet_to_ls2_batch(&self, scet: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Scet, Ls2>(scet)
    }

    pub fn ls2_to_scet(&self, ls2: f64) -> Result<f64> {
        self.table.convert::<Ls2, Scet>(ls2)
    }

    pub fn ls2_to_scet_batch(&self, ls2: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Ls2, Scet>(ls2)
    }

    pub fn jd_to_scet(&self, julian_date: f64) -> Result<f64> {
        self.table.convert::<Jdut, Scet>(julian_date)
    }

    pub fn jd_to_scet_batch(&self, julian_dates: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Jdut, Scet>(julian_dates)
    }

    pub fn scet_to_jd(&self, scet: f64) -> Result<f64> {
        self.table.convert::<Scet, Jdut>(scet)
    }

    pub fn scet_to_jd_batch(&self, scet: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Scet, Jdut>(scet)
    }

    pub fn jd_to_ls2(&self, julian_date: f64) -> Result<f64> {
        self.table.convert::<Jdut, Ls2>(julian_date)
    }

    pub fn jd_to_ls2_batch(&self, julian_dates: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Jdut, Ls2>(julian_dates)
    }

    pub fn ls2_to_jd(&self, ls2: f64) -> Result<f64> {
        self.table.convert::<Ls2, Jdut>(ls2)
    }

    pub fn ls2_to_jd_batch(&self, ls2: &[f64]) -> Result<Vec<f64>> {
        self.table.convert_batch::<Ls2, Jdut>(ls2)
    }

    pub fn instant_to_ls2(&self, instant: NaiveDateTime) -> Result<f64> {
        self.scet_to_ls2(instant_to_scet(instant))
    }

    pub fn instant_to_ls2_batch(&self, instants: &[NaiveDateTime]) -> Result<Vec<f64>> {
        let scet: Vec<f64> = instants.iter().copied().map(instant_to_scet).collect();
        self.scet_to_ls2_batch(&scet)
    }

    pub fn ls2_to_instant(&self, ls2: f64) -> Result<NaiveDateTime> {
        scet_to_instant(self.ls2_to_scet(ls2)?)
    }

    pub fn ls2_to_instant_batch(&self, ls2: &[f64]) -> Result<Vec<NaiveDateTime>> {
        self.ls2_to_scet_batch(ls2)?
            .into_iter()
            .map(scet_to_instant)
            .collect()
    }

    /// In-year Ls at `instant`.
    pub fn instant_to_ls(&self, instant: NaiveDateTime) -> Result<f64> {
        self.instant_to_ls2(instant).map(ls2_to_ls)
    }

    pub fn instant_to_sy_ls(&self, instant: NaiveDateTime) -> Result<SaturnLongitude> {
        self.instant_to_ls2(instant).map(ls2_to_sy_ls)
    }

    pub fn instant_to_sy_ls_batch(
        &self,
        instants: &[NaiveDateTime],
    ) -> Result<Vec<SaturnLongitude>> {
        Ok(self
            .instant_to_ls2_batch(instants)?
            .into_iter()
            .map(ls2_to_sy_ls)
            .collect())
    }

    pub fn sy_ls_to_instant(&self, longitude: SaturnLongitude) -> Result<NaiveDateTime> {
        self.ls2_to_instant(sy_ls_to_ls2(longitude))
    }

    pub fn sy_ls_to_instant_batch(
        &self,
        longitudes: &[SaturnLongitude],
    ) -> Result<Vec<NaiveDateTime>> {
        let ls2: Vec<f64> = longitudes.iter().copied().map(sy_ls_to_ls2).collect();
        self.ls2_to_instant_batch(&ls2)
    }

    /// Ls2 at a free-form date string.
    ///
    /// The result carries a [`DateCaveat`](crate::DateCaveat) when the
    /// string has no explicit zone and was read as UT.
    pub fn datestr_to_ls2(&self, date: &str) -> Result<Caveated<f64>> {
        parse_date_string(date)?.and_then(|instant| self.instant_to_ls2(instant))
    }

    /// In-year Ls at a free-form date string.
    pub fn datestr_to_ls(&self, date: &str) -> Result<Caveated<f64>> {
        Ok(self.datestr_to_ls2(date)?.map(ls2_to_ls))
    }

    /// Saturn year and Ls at a free-form date string.
    pub fn datestr_to_sy_ls(&self, date: &str) -> Result<Caveated<SaturnLongitude>> {
        Ok(self.datestr_to_ls2(date)?.map(ls2_to_sy_ls))
    }
}

// ── Shared handle ─────────────────────────────────────────────────────────

/// Replaceable reference to the current table.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it for as long
/// as they like; [`replace`](Self::replace) publishes a new table without
/// touching the old one.
#[derive(Debug)]
pub struct SharedTable {
    current: RwLock<Arc<ConversionTable>>,
}

impl SharedTable {
    pub fn new(table: ConversionTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The table published at the time of the call.
    pub fn snapshot(&self) -> Arc<ConversionTable> {
        // The guarded value is a single Arc, so a poisoned lock still holds
        // a complete table.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A converter over the current snapshot.
    pub fn converter(&self) -> Converter {
        Converter::new(self.snapshot())
    }

    /// Publishes `table` and returns the previous one.
    pub fn replace(&self, table: ConversionTable) -> Arc<ConversionTable> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, Arc::new(table));
        tracing::info!(
            rows = current.len(),
            previous_rows = previous.len(),
            "replaced conversion table"
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::{ANCHORS, SATURN_YEAR};
    use crate::error::SaturnLsError;
    use crate::instant::julian_date_to_instant;
    use crate::sample::RawSample;
    use crate::table::TableBuilder;

    /// Daily samples with Ls = 0 exactly at the Saturn-year 1 anchor.
    fn converter(days_before: usize, days: usize) -> Converter {
        let zero = ANCHORS[1].julian_date;
        let samples: Vec<RawSample> = (0..days)
            .map(|d| {
                let jd = zero - days_before as f64 + d as f64;
                let ls2 = 360.0 * (jd - zero) / SATURN_YEAR.value();
                RawSample {
                    instant: julian_date_to_instant(jd).unwrap(),
                    julian_date: jd,
                    ls: ls2.rem_euclid(360.0),
                    light_time: None,
                }
            })
            .collect();
        TableBuilder::new().build(&samples).unwrap().into()
    }

    #[test]
    fn year_split_is_pure_arithmetic() {
        let sy = ls2_to_sy_ls(1_000.0);
        assert_eq!(sy, SaturnLongitude::new(3, 280.0));
        assert_eq!(sy_ls_to_ls2(sy), 1_000.0);
        assert_eq!(ls2_to_ls(-10.0), 350.0);
        assert_eq!(ls2_to_sy_ls(-10.0).saturn_year, 0);
    }

    #[test]
    fn in_year_ls_agrees_with_year_split() {
        for ls2 in [-1e-15, -360.0 - 1e-13, 719.999_999_999_999_9, 0.0, 1e12] {
            let ls = ls2_to_ls(ls2);
            assert!((0.0..360.0).contains(&ls), "ls2 {ls2} gave {ls}");
            assert_eq!(ls, ls2_to_sy_ls(ls2).ls);
        }
        assert_eq!(ls2_to_ls(-1e-15), 0.0);
    }

    #[test]
    fn start_of_year_one_is_the_anchor() {
        let conv = converter(20, 40);
        let instant = conv.sy_ls_to_instant(SaturnLongitude::new(1, 0.0)).unwrap();
        let expected = ANCHORS[1].instant().unwrap();
        let diff = (instant - expected).num_microseconds().unwrap().abs();
        assert!(diff < 1_000, "off by {diff} µs");
        assert_eq!(conv.ls2_to_jd(0.0).unwrap(), 2_433_546.293_529_330_8);
    }

    #[test]
    fn round_trip_at_nodes() {
        let conv = converter(20, 40);
        for row in conv.table().rows() {
            let ls2 = conv.scet_to_ls2(row.epoch_seconds).unwrap();
            assert!((ls2 - row.ls2).abs() < 1e-9);
            let scet = conv.ls2_to_scet(row.ls2).unwrap();
            assert!((scet - row.epoch_seconds).abs() < 1e-6);
            let jd = conv.scet_to_jd(row.epoch_seconds).unwrap();
            assert!((jd - row.julian_date).abs() < 1e-9);
        }
    }

    #[test]
    fn instants_chain_through_scet() {
        let conv = converter(20, 40);
        let row = conv.table().rows()[30];
        assert!((conv.instant_to_ls2(row.instant).unwrap() - row.ls2).abs() < 1e-9);
        let sy = conv.instant_to_sy_ls(row.instant).unwrap();
        assert_eq!(sy.saturn_year, 1);
        assert!((conv.instant_to_ls(row.instant).unwrap() - sy.ls).abs() < 1e-12);
        let back = conv.sy_ls_to_instant(sy).unwrap();
        assert!((back - row.instant).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn batches_keep_order_and_are_all_or_nothing() {
        let conv = converter(20, 40);
        let rows = conv.table().rows();
        let scet = [rows[10].epoch_seconds, rows[3].epoch_seconds, rows[25].epoch_seconds];
        let ls2 = conv.scet_to_ls2_batch(&scet).unwrap();
        assert_eq!(ls2.len(), 3);
        assert!(ls2[0] > ls2[1] && ls2[2] > ls2[0]);

        let (min, _) = conv.table().span::<Scet>();
        let bad = [rows[10].epoch_seconds, min - 1.0];
        assert!(matches!(
            conv.scet_to_ls2_batch(&bad),
            Err(SaturnLsError::OutOfRange { value, .. }) if value == min - 1.0
        ));

        let instants: Vec<NaiveDateTime> = rows.iter().map(|r| r.instant).collect();
        let years = conv.instant_to_sy_ls_batch(&instants).unwrap();
        assert_eq!(years.len(), rows.len());
        assert_eq!(years[0].saturn_year, 0);
        assert_eq!(years[39].saturn_year, 1);
    }

    #[test]
    fn range_is_enforced_one_second_outside() {
        let conv = converter(20, 40);
        let (min, max) = conv.table().span::<Scet>();
        assert!(conv.scet_to_ls2(min).is_ok());
        assert!(conv.scet_to_ls2(max).is_ok());
        for scet in [min - 1.0, max + 1.0] {
            assert!(matches!(
                conv.scet_to_ls2(scet),
                Err(SaturnLsError::OutOfRange { axis: "SCET", .. })
            ));
        }
    }

    #[test]
    fn date_strings_carry_their_caveat() {
        let conv = converter(20, 40);
        let exact = conv.datestr_to_ls2("1950-09-21T19:02:40Z").unwrap();
        assert!(exact.is_exact());
        assert!(exact.value.abs() < 1e-4);

        let naive = conv.datestr_to_sy_ls("1950-09-25 00:00:00").unwrap();
        assert!(!naive.is_exact());
        assert_eq!(naive.value.saturn_year, 1);

        let ls = conv.datestr_to_ls("1950-09-25 00:00:00").unwrap();
        assert!(!ls.is_exact());
        assert_eq!(ls.value, naive.value.ls);
        let before = conv.datestr_to_ls("1950-09-20T00:00:00Z").unwrap();
        assert!(before.is_exact());
        assert!(before.value > 359.0 && before.value < 360.0);

        assert!(matches!(
            conv.datestr_to_ls2("1960-01-01T00:00:00Z"),
            Err(SaturnLsError::OutOfRange { .. })
        ));
    }

    #[test]
    fn shared_table_swaps_whole_tables() {
        let shared = SharedTable::new(converter(20, 40).table().clone());
        let before = shared.snapshot();
        let wider = converter(40, 80).table().clone();
        let previous = shared.replace(wider);
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.len(), 40);
        assert_eq!(shared.snapshot().len(), 80);
        assert_eq!(shared.converter().table().len(), 80);
    }

    #[test]
    fn converter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
        assert_send_sync::<SharedTable>();

        let conv = converter(20, 40);
        let scet = conv.table().rows()[5].epoch_seconds;
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let conv = conv.clone();
                std::thread::spawn(move || conv.scet_to_ls2(scet).unwrap())
            })
            .collect();
        let expected = conv.scet_to_ls2(scet).unwrap();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
