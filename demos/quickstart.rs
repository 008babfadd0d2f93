use saturn_ls::{
    julian_date_to_instant, Converter, RawSample, SaturnLongitude, TableBuilder, ANCHORS,
};

/// Daily samples across Saturn year 3 with Ls linear between its anchors.
fn samples() -> saturn_ls::Result<Vec<RawSample>> {
    let (start, end) = (ANCHORS[3].julian_date, ANCHORS[4].julian_date);
    (0..4_000)
        .map(|d| {
            let jd = start - 20.0 + d as f64;
            let ls = (360.0 * (jd - start) / (end - start)).rem_euclid(360.0);
            Ok(RawSample {
                instant: julian_date_to_instant(jd)?,
                julian_date: jd,
                ls,
                light_time: None,
            })
        })
        .collect()
}

fn main() -> saturn_ls::Result<()> {
    let table = match std::env::args().nth(1) {
        Some(path) => TableBuilder::new().build_from_csv_path(path)?,
        None => TableBuilder::new().build(&samples()?)?,
    };
    let conv = Converter::from(table);

    let sy3 = conv.sy_ls_to_instant(SaturnLongitude::new(3, 0.0))?;
    println!("SY 3 Ls 0: {sy3}");

    let solstice = conv.sy_ls_to_instant(SaturnLongitude::new(3, 90.0))?;
    println!("SY 3 Ls 90: {solstice}");

    let at = conv.datestr_to_sy_ls("2017-09-15T10:32:00Z")?;
    println!("2017-09-15T10:32:00Z: {}", at.value);
    Ok(())
}
