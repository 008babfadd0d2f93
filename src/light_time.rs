// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Observer light-time correction.
//!
//! Ephemerides report Ls as seen by the observer, i.e. as it was at Saturn
//! one light time earlier. To tabulate the longitude *at Saturn*:
//!
//! 1. shift every sample back to its emission date,
//!    `jd_emitted = jd − light_time / 86400`;
//! 2. interpolate the mapping `jd_emitted → ls2` (linear, extended past
//!    both ends) at the sample's own `jd`;
//! 3. add the difference to both `ls` and `ls2`.
//!
//! Samples without a light time, or whose corrected value is not finite,
//! are dropped. With every light time equal to zero the table is returned
//! unchanged.

use crate::error::Result;
use crate::interp::{Interpolation, Interpolator};
use crate::unwrap::UnwrappedSample;
use qtty::Day;

/// Corrects unwrapped samples from observed to emitted longitude.
pub fn correct_light_time(samples: &[UnwrappedSample]) -> Result<Vec<UnwrappedSample>> {
    let mut emitted_jd = Vec::with_capacity(samples.len());
    let mut emitted_ls2 = Vec::with_capacity(samples.len());
    for sample in samples {
        let Some(light_time) = sample.light_time else {
            continue;
        };
        let jd = sample.julian_date - light_time.to::<Day>().value();
        // Keep the emission dates strictly increasing.
        if emitted_jd.last().map_or(true, |&last| jd > last) {
            emitted_jd.push(jd);
            emitted_ls2.push(sample.ls2);
        }
    }

    let mapping = Interpolator::new(
        "emitted JDUT",
        &emitted_jd,
        &emitted_ls2,
        Interpolation::Linear,
    )?;

    let corrected: Vec<UnwrappedSample> = samples
        .iter()
        .filter(|s| s.light_time.is_some())
        .filter_map(|s| {
            let delta = mapping.eval_extrapolating(s.julian_date) - s.ls2;
            delta.is_finite().then(|| UnwrappedSample {
                ls: s.ls + delta,
                ls2: s.ls2 + delta,
                ..*s
            })
        })
        .collect();

    tracing::debug!(
        input = samples.len(),
        kept = corrected.len(),
        dropped = samples.len() - corrected.len(),
        "applied light-time correction"
    );
    Ok(corrected)
}
