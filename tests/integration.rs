use chrono::NaiveDateTime;
use qtty::Seconds;
use saturn_ls::{
    horizons, table_io, ConversionTable, Converter, Interpolation, Jdut, LightTimeMode, Ls2,
    RawSample, SaturnLongitude, SaturnLsError, Scet, TableBuilder, ANCHORS,
};
use std::f64::consts::TAU;
use tempfile::TempDir;

/// Ls of a uniformly sampled Saturn year with an eccentricity-like wobble,
/// exactly 0 at the year's start anchor and 360 at the next one.
fn ls_between(start: f64, end: f64, julian_date: f64) -> f64 {
    let f = (julian_date - start) / (end - start);
    (360.0 * f + 6.0 * (TAU * f).sin()).rem_euclid(360.0)
}

fn daily_samples(first: f64, days: usize, year: usize) -> Vec<RawSample> {
    let (start, end) = (ANCHORS[year].julian_date, ANCHORS[year + 1].julian_date);
    (0..days)
        .map(|d| {
            let jd = first + d as f64;
            RawSample {
                instant: saturn_ls::julian_date_to_instant(jd).unwrap(),
                julian_date: jd,
                ls: ls_between(start, end, jd),
                light_time: None,
            }
        })
        .collect()
}

/// Ten Earth years of daily samples starting one month before SY 3.
fn sy3_table() -> ConversionTable {
    let start = ANCHORS[3].julian_date;
    let mut samples = daily_samples(start - 30.0, 30, 2);
    samples.extend(daily_samples(start, 3_653, 3));
    TableBuilder::new().build(&samples).unwrap()
}

#[test]
fn raw_sample_julian_date_matches_instant() {
    let anchor = &ANCHORS[1];
    let sample = RawSample::new(anchor.instant().unwrap(), 0.0);
    assert!((sample.julian_date - anchor.julian_date).abs() < 1e-9);
}

#[test]
fn table_rows_are_strictly_increasing() {
    let table = sy3_table();
    for pair in table.rows().windows(2) {
        assert!(pair[0].julian_date < pair[1].julian_date);
        assert!(pair[0].epoch_seconds < pair[1].epoch_seconds);
        assert!(pair[0].ls2 < pair[1].ls2);
    }
}

#[test]
fn saturn_year_is_consistent_with_ls2() {
    let table = sy3_table();
    for row in table.rows() {
        assert_eq!(row.saturn_year, (row.ls2 / 360.0).floor() as i32 + 1);
        let ls = row.ls2 - 360.0 * (row.saturn_year - 1) as f64;
        assert!((row.ls - ls).abs() < 1e-9);
        assert!((0.0..360.0).contains(&row.ls));
    }
}

#[test]
fn round_trip_at_every_node() {
    let conv = Converter::from(sy3_table());
    for row in conv.table().rows() {
        let ls2 = conv.scet_to_ls2(row.epoch_seconds).unwrap();
        assert!((ls2 - row.ls2).abs() < 1e-9);
        let back = conv.ls2_to_scet(ls2).unwrap();
        assert!((back - row.epoch_seconds).abs() < 1e-6);
    }
}

#[test]
fn queries_outside_the_table_fail() {
    let conv = Converter::from(sy3_table());
    let (min, max) = conv.table().span::<Scet>();
    for scet in [min - 1.0, max + 1.0] {
        match conv.scet_to_ls2(scet) {
            Err(SaturnLsError::OutOfRange {
                axis,
                value,
                min: lo,
                max: hi,
            }) => {
                assert_eq!(axis, "SCET");
                assert_eq!(value, scet);
                assert_eq!((lo, hi), (min, max));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }
    let (_, ls2_max) = conv.table().span::<Ls2>();
    assert!(conv.ls2_to_instant(ls2_max + 1.0).is_err());
    assert!(conv.scet_to_ls2(f64::NAN).is_err());
}

#[test]
fn ten_years_inside_saturn_year_three() {
    let table = sy3_table();
    let anchor = ANCHORS[3].julian_date;
    let inside: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.julian_date >= anchor)
        .collect();
    assert_eq!(inside.len(), 3_653);
    assert!(inside.iter().all(|r| r.saturn_year == 3));

    let before: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.julian_date < anchor)
        .collect();
    assert!(before.iter().all(|r| r.saturn_year == 2));

    let first = inside[0];
    assert_eq!(first.ls2, 720.0);
    let growth = inside[inside.len() - 1].ls2 - first.ls2;
    let expected = ls_between(anchor, ANCHORS[4].julian_date, anchor + 3_652.0);
    assert!((growth - expected).abs() < 1e-9);
}

#[test]
fn whole_saturn_year_grows_by_one_cycle() {
    let (start, end) = (ANCHORS[3].julian_date, ANCHORS[4].julian_date);
    let days = (end - start).floor() as usize;
    let table = TableBuilder::new()
        .build(&daily_samples(start, days, 3))
        .unwrap();
    let (lo, hi) = table.span::<Ls2>();
    assert!(table.rows().iter().all(|r| r.saturn_year == 3));
    assert!(hi - lo > 359.9 && hi - lo < 360.0, "growth {}", hi - lo);
}

#[test]
fn start_of_saturn_year_one_is_the_anchor_instant() {
    let start = ANCHORS[1].julian_date;
    let mut samples = daily_samples(start - 15.0, 15, 0);
    samples.extend(daily_samples(start, 30, 1));
    let conv = Converter::from(TableBuilder::new().build(&samples).unwrap());

    let instant = conv.sy_ls_to_instant(SaturnLongitude::new(1, 0.0)).unwrap();
    let expected =
        NaiveDateTime::parse_from_str("1950-09-21 19:02:40.93", "%Y-%m-%d %H:%M:%S%.f").unwrap();
    let diff = (instant - expected).num_milliseconds().abs();
    assert!(diff <= 5, "off by {diff} ms");
    assert_eq!(conv.ls2_to_jd(0.0).unwrap(), 2_433_546.293_529_330_8);
}

#[test]
fn zero_light_time_changes_nothing() {
    let mut samples = daily_samples(ANCHORS[3].julian_date - 30.0, 30, 2);
    samples.extend(daily_samples(ANCHORS[3].julian_date, 60, 3));
    let zero_lt: Vec<RawSample> = samples
        .iter()
        .map(|s| s.with_light_time(Seconds::new(0.0)))
        .collect();
    let plain = TableBuilder::new().build(&samples).unwrap();
    let corrected = TableBuilder::new().build(&zero_lt).unwrap();
    for (a, b) in plain.rows().iter().zip(corrected.rows()) {
        assert_eq!(a.ls2, b.ls2);
        assert_eq!(a.ls, b.ls);
    }
}

#[test]
fn light_time_advances_longitude() {
    let start = ANCHORS[3].julian_date;
    let samples: Vec<RawSample> = daily_samples(start, 200, 3)
        .into_iter()
        .map(|s| s.with_light_time(Seconds::new(4_800.0)))
        .collect();
    let plain = TableBuilder::new()
        .light_time(LightTimeMode::Skip)
        .build(&samples)
        .unwrap();
    let corrected = TableBuilder::new().build(&samples).unwrap();
    assert_eq!(plain.len(), corrected.len());
    let rate = 360.0 / (ANCHORS[4].julian_date - start);
    let expected = rate * 4_800.0 / 86_400.0;
    for (a, b) in plain.rows().iter().zip(corrected.rows()).skip(1) {
        let shift = b.ls2 - a.ls2;
        assert!(shift > 0.0 && (shift - expected).abs() < 0.2 * expected);
    }
}

#[test]
fn cubic_and_linear_agree_at_nodes() {
    let linear = sy3_table();
    let cubic = linear.with_interpolation(Interpolation::MonotoneCubic);
    for row in linear.rows().iter().step_by(97) {
        assert_eq!(cubic.convert::<Jdut, Ls2>(row.julian_date).unwrap(), row.ls2);
    }
    let a = linear.rows()[100].julian_date + 0.5;
    let diff = cubic.convert::<Jdut, Ls2>(a).unwrap() - linear.convert::<Jdut, Ls2>(a).unwrap();
    assert!(diff.abs() < 1e-3);
}

#[test]
fn csv_file_rebuilds_the_same_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saturn-Ls.csv");
    let table = sy3_table();
    table_io::write_samples_csv_path(&path, &table).unwrap();

    let reloaded = ConversionTable::from_csv_path(&path).unwrap();
    assert_eq!(reloaded.len(), table.len());
    for (a, b) in table.rows().iter().zip(reloaded.rows()) {
        assert_eq!(a.instant, b.instant);
        assert_eq!(a.julian_date, b.julian_date);
        assert_eq!(a.saturn_year, b.saturn_year);
        assert!((a.ls2 - b.ls2).abs() < 1e-9);
    }
}

#[test]
fn missing_table_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        ConversionTable::from_csv_path(dir.path().join("absent.csv")),
        Err(SaturnLsError::Io(_))
    ));
}

#[test]
fn horizons_export_builds_a_table() {
    let text = "\
 Date__(UT)__HR:MN, Date_________JDUT, , , App_Lon_Sun,  1-way_down_LT,
*******************************************************************************
$$SOE
 1950-Sep-21 00:00, 2433545.500000000, , , 359.9734,   75.104532,
 1950-Sep-22 00:00, 2433546.500000000, , , 0.0069,   75.110215,
 1950-Sep-23 00:00, 2433547.500000000, , , 0.0404,   75.115894,
$$EOE
";
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("horizons_saturn.txt");
    std::fs::write(&path, text).unwrap();

    let samples = horizons::load_observer_table(&path).unwrap();
    assert!(samples.iter().all(|s| s.light_time.is_some()));

    let table = TableBuilder::new().build_from_horizons_path(&path).unwrap();
    let years: Vec<i32> = table.rows().iter().map(|r| r.saturn_year).collect();
    assert_eq!(years, vec![0, 1, 1]);
    assert!(table.rows()[0].ls2 < 0.0);
    assert!(table.rows()[1].ls > 0.0069);
}

#[test]
fn samples_without_crossing_cannot_be_anchored() {
    let start = ANCHORS[3].julian_date;
    let samples = daily_samples(start + 100.0, 50, 3);
    assert!(matches!(
        TableBuilder::new().build(&samples),
        Err(SaturnLsError::InsufficientAnchorData)
    ));
}

#[cfg(feature = "serde")]
#[test]
fn serde_rows_use_field_names() {
    let table = sy3_table();
    let json = serde_json::to_string(&table.rows()[40]).unwrap();
    assert!(json.contains("saturn_year"));
    assert!(json.contains("epoch_seconds"));

    let value = SaturnLongitude::new(3, 12.5);
    let back: SaturnLongitude =
        serde_json::from_str(&serde_json::to_string(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}
