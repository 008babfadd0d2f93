// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Reduced table file.
//!
//! A comma-separated file with a header row:
//!
//! | Column | Required | Content |
//! |--------|----------|---------|
//! | `date` | no | UT calendar instant, `%Y-%m-%d %H:%M:%S%.f` (or with `T`) |
//! | `JDUT` | yes | Julian Date, UT |
//! | `Ls` | yes | instantaneous solar longitude, degrees |
//! | `LT` | no | one-way light time, seconds |
//!
//! Without a `date` column the instant is derived from `JDUT`. Missing or
//! unparseable values are errors; no row is skipped silently.

use crate::error::{Result, SaturnLsError};
use crate::instant::julian_date_to_instant;
use crate::sample::RawSample;
use crate::table::ConversionTable;
use chrono::NaiveDateTime;
use qtty::Seconds;
use std::fs::File;
use std::io;
use std::path::Path;

const DATE: &str = "date";
const JDUT: &str = "JDUT";
const LS: &str = "Ls";
const LT: &str = "LT";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn missing_column(name: &str) -> SaturnLsError {
    SaturnLsError::Ephemeris(format!("table file has no {name:?} column"))
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    row: usize,
    name: &str,
) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SaturnLsError::Ephemeris(format!(
            "row {row}: missing {name} value"
        ))),
    }
}

fn number(record: &csv::StringRecord, index: usize, row: usize, name: &str) -> Result<f64> {
    let value = field(record, index, row, name)?;
    value.parse().map_err(|_| {
        SaturnLsError::Ephemeris(format!("row {row}: {name} value {value:?} is not a number"))
    })
}

/// Reads raw samples from a reduced table file.
pub fn read_samples_csv<R: io::Read>(reader: R) -> Result<Vec<RawSample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let jd_col = column(&headers, JDUT).ok_or_else(|| missing_column(JDUT))?;
    let ls_col = column(&headers, LS).ok_or_else(|| missing_column(LS))?;
    let date_col = column(&headers, DATE);
    let lt_col = column(&headers, LT);

    let mut samples = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let julian_date = number(&record, jd_col, row, JDUT)?;
        let ls = number(&record, ls_col, row, LS)?;
        let instant = match date_col {
            Some(index) => {
                let value = field(&record, index, row, DATE)?;
                parse_date(value)
                    .ok_or_else(|| SaturnLsError::UnparseableDate(value.to_string()))?
            }
            None => julian_date_to_instant(julian_date)?,
        };
        let light_time = lt_col
            .map(|index| number(&record, index, row, LT))
            .transpose()?
            .map(Seconds::new);
        samples.push(RawSample {
            instant,
            julian_date,
            ls,
            light_time,
        });
    }
    tracing::debug!(rows = samples.len(), "read reduced table file");
    Ok(samples)
}

/// Opens and reads a reduced table file.
pub fn read_samples_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawSample>> {
    read_samples_csv(File::open(path)?)
}

/// Writes `date,JDUT,Ls` for every row of `table`.
///
/// Reading the output back with no light time rebuilds the same table.
pub fn write_samples_csv<W: io::Write>(writer: W, table: &ConversionTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([DATE, JDUT, LS])?;
    for row in table.rows() {
        csv_writer.write_record([
            row.instant.format(WRITE_FORMAT).to_string(),
            row.julian_date.to_string(),
            row.ls.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Creates `path` and writes `table` to it.
pub fn write_samples_csv_path<P: AsRef<Path>>(path: P, table: &ConversionTable) -> Result<()> {
    write_samples_csv(File::create(path)?, table)
}
