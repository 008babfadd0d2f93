// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! JPL Horizons observer-table scraping.
//!
//! Reads the text export of an observer table requested with
//! `CSV_FORMAT=YES` and quantity 44 (`App_Lon_Sun`), optionally with the
//! one-way light time. Only the block between `$$SOE` and `$$EOE` is data;
//! the column names sit two lines above `$$SOE`, e.g.
//!
//! ```text
//!  Date__(UT)__HR:MN:SC.fff, Date_________JDUT, , , App_Lon_Sun,  1-way_down_LT,
//! ***************************************************************************
//! $$SOE
//!  1950-Sep-21 00:00:00.000, 2433545.500000000, , , 359.9734,   75.104532,
//! ```
//!
//! Column names are normalised before lookup: blanks and `%()./:` are
//! removed, `*` and `-` become `_`, and runs of `_` collapse to one.

use crate::error::{Result, SaturnLsError};
use crate::sample::RawSample;
use chrono::NaiveDateTime;
use qtty::Seconds;
use std::path::Path;

const START: &str = "$$SOE";
const END: &str = "$$EOE";

/// Horizons reports light time in minutes.
const SECONDS_PER_MINUTE: f64 = 60.0;

const DATE_FORMATS: [&str; 2] = ["%Y-%b-%d %H:%M:%S%.f", "%Y-%b-%d %H:%M"];

fn normalise_column(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ' ' | '\t' | '%' | '(' | ')' | '.' | '/' | ':' => {}
            '*' | '-' | '_' => {
                if !out.ends_with('_') {
                    out.push('_');
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.strip_prefix("A.D.").map_or(value, str::trim_start);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn error(message: impl Into<String>) -> SaturnLsError {
    SaturnLsError::Ephemeris(message.into())
}

#[derive(Debug)]
struct Layout {
    date: usize,
    julian_date: usize,
    ls: usize,
    light_time: Option<usize>,
}

impl Layout {
    fn from_header(line: &str) -> Result<Self> {
        let names: Vec<String> = line.split(',').map(normalise_column).collect();
        let find = |pred: fn(&str) -> bool| names.iter().position(|n| pred(n.as_str()));
        Ok(Self {
            date: find(|n| n.starts_with("Date_UT"))
                .ok_or_else(|| error("observer table has no UT date column"))?,
            julian_date: find(|n| n.ends_with("JDUT"))
                .ok_or_else(|| error("observer table has no JDUT column"))?,
            ls: find(|n| n == "App_Lon_Sun")
                .ok_or_else(|| error("observer table has no App_Lon_Sun column"))?,
            light_time: find(|n| n.starts_with("1_way") && n.ends_with("LT")),
        })
    }
}

fn required<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    row: usize,
    name: &str,
) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() && value != "n.a." => Ok(value),
        _ => Err(error(format!("row {row}: missing {name}"))),
    }
}

fn number(record: &csv::StringRecord, index: usize, row: usize, name: &str) -> Result<f64> {
    let value = required(record, index, row, name)?;
    value
        .parse()
        .map_err(|_| error(format!("row {row}: {name} value {value:?} is not a number")))
}

/// Extracts raw samples from the text of a Horizons observer table.
pub fn parse_observer_table(text: &str) -> Result<Vec<RawSample>> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| l.trim() == START)
        .ok_or_else(|| error("no $$SOE marker"))?;
    let end = lines[start..]
        .iter()
        .position(|l| l.trim() == END)
        .map(|offset| start + offset)
        .ok_or_else(|| error("no $$EOE marker"))?;
    let header = start
        .checked_sub(2)
        .map(|i| lines[i])
        .ok_or_else(|| error("no column header above $$SOE"))?;
    let layout = Layout::from_header(header)?;

    let block = lines[start + 1..end].join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(block.as_bytes());

    let mut samples = Vec::with_capacity(end - start - 1);
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let date = required(&record, layout.date, row, "date")?;
        let instant =
            parse_date(date).ok_or_else(|| SaturnLsError::UnparseableDate(date.to_string()))?;
        let julian_date = number(&record, layout.julian_date, row, "JDUT")?;
        let ls = number(&record, layout.ls, row, "App_Lon_Sun")?;
        let light_time = layout
            .light_time
            .map(|index| number(&record, index, row, "light time"))
            .transpose()?
            .map(|minutes| Seconds::new(minutes * SECONDS_PER_MINUTE));
        samples.push(RawSample {
            instant,
            julian_date,
            ls,
            light_time,
        });
    }
    tracing::debug!(
        rows = samples.len(),
        light_time = layout.light_time.is_some(),
        "parsed Horizons observer table"
    );
    Ok(samples)
}

/// Reads a Horizons observer-table export from disk.
pub fn load_observer_table<P: AsRef<Path>>(path: P) -> Result<Vec<RawSample>> {
    let text = std::fs::read_to_string(path)?;
    parse_observer_table(&text)
}
