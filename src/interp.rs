// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Range-checked interpolation over a strictly increasing abscissa.
//!
//! An [`Interpolator`] borrows two equally long columns `xs`, `ys` and
//! evaluates `y(x)` for any `x` inside `[xs[0], xs[n-1]]`. Queries outside
//! that span fail with [`SaturnLsError::OutOfRange`]; nothing is ever
//! clamped or silently extrapolated. Inverse queries are the same operation
//! with the columns swapped, which is valid whenever `ys` is itself strictly
//! increasing.
//!
//! Two methods are available:
//!
//! | [`Interpolation`] | Shape | Exact at nodes |
//! |-------------------|-------|----------------|
//! | `Linear` (default) | piecewise linear | yes |
//! | `MonotoneCubic` | Fritsch–Carlson piecewise cubic Hermite | yes |
//!
//! The monotone cubic never overshoots the data, so a monotonic table stays
//! monotonic and its inverse remains single-valued.

use crate::error::{Result, SaturnLsError};

/// Interpolation method between bracketing table nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    #[default]
    Linear,
    MonotoneCubic,
}

/// Interpolator borrowing its abscissa and ordinate columns.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    axis: &'static str,
    xs: &'a [f64],
    ys: &'a [f64],
    method: Interpolation,
}

impl<'a> Interpolator<'a> {
    /// Validates the columns and builds an interpolator.
    ///
    /// `axis` names the abscissa in error messages. The columns must have
    /// the same length (at least 2), finite values, and a strictly
    /// increasing `xs`.
    pub fn new(
        axis: &'static str,
        xs: &'a [f64],
        ys: &'a [f64],
        method: Interpolation,
    ) -> Result<Self> {
        let found = xs.len().min(ys.len());
        if xs.len() != ys.len() || found < 2 {
            return Err(SaturnLsError::InsufficientSamples { found });
        }
        if let Some(index) = xs.iter().chain(ys).position(|v| !v.is_finite()) {
            return Err(SaturnLsError::NonFiniteSample {
                index: index % xs.len(),
            });
        }
        check_strictly_increasing(axis, xs)?;
        Ok(Self::trusted(axis, xs, ys, method))
    }

    /// Builds an interpolator over columns already validated by the caller.
    pub(crate) fn trusted(
        axis: &'static str,
        xs: &'a [f64],
        ys: &'a [f64],
        method: Interpolation,
    ) -> Self {
        debug_assert!(xs.len() == ys.len() && xs.len() >= 2);
        Self {
            axis,
            xs,
            ys,
            method,
        }
    }

    /// Smallest and largest valid query.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Whether `x` may be queried. NaN never is.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        let (min, max) = self.bounds();
        x >= min && x <= max
    }

    fn check(&self, x: f64) -> Result<()> {
        if self.contains(x) {
            return Ok(());
        }
        let (min, max) = self.bounds();
        Err(SaturnLsError::OutOfRange {
            axis: self.axis,
            value: x,
            min,
            max,
        })
    }

    /// Interpolated `y` at `x`.
    pub fn eval(&self, x: f64) -> Result<f64> {
        self.check(x)?;
        Ok(self.eval_unchecked(x))
    }

    /// Interpolated `y` for every query, in order.
    ///
    /// Fails without evaluating anything if any query is out of range.
    pub fn eval_batch(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().try_for_each(|&x| self.check(x))?;
        Ok(xs.iter().map(|&x| self.eval_unchecked(x)).collect())
    }

    /// The same table keyed on the other column.
    pub fn inverse(&self, axis: &'static str) -> Result<Interpolator<'a>> {
        check_strictly_increasing(axis, self.ys)?;
        Ok(Self::trusted(axis, self.ys, self.xs, self.method))
    }

    /// Linear evaluation that extends the end segments past the table.
    ///
    /// Only table construction uses this; public queries never extrapolate.
    pub(crate) fn eval_extrapolating(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = if x < self.xs[0] {
            0
        } else if x > self.xs[n - 1] {
            n - 2
        } else {
            return self.eval_unchecked(x);
        };
        let slope = (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + slope * (x - self.xs[i])
    }

    /// Index `i` of the segment `[xs[i], xs[i+1]]` holding `x`.
    #[inline]
    fn segment(&self, x: f64) -> usize {
        self.xs
            .partition_point(|&v| v <= x)
            .saturating_sub(1)
            .min(self.xs.len() - 2)
    }

    fn eval_unchecked(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        if x == x0 {
            return y0;
        }
        if x == x1 {
            return y1;
        }

        let h = x1 - x0;
        let t = (x - x0) / h;
        match self.method {
            Interpolation::Linear => y0 + t * (y1 - y0),
            Interpolation::MonotoneCubic => {
                let (d0, d1) = (self.slope(i), self.slope(i + 1));
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                h00 * y0 + h10 * h * d0 + h01 * y1 + h11 * h * d1
            }
        }
    }

    #[inline]
    fn secant(&self, k: usize) -> f64 {
        (self.ys[k + 1] - self.ys[k]) / (self.xs[k + 1] - self.xs[k])
    }

    #[inline]
    fn width(&self, k: usize) -> f64 {
        self.xs[k + 1] - self.xs[k]
    }

    /// Fritsch–Carlson derivative estimate at node `k`.
    fn slope(&self, k: usize) -> f64 {
        let n = self.xs.len();
        if n == 2 {
            return self.secant(0);
        }
        if k == 0 {
            return end_slope(self.width(0), self.width(1), self.secant(0), self.secant(1));
        }
        if k == n - 1 {
            return end_slope(
                self.width(n - 2),
                self.width(n - 3),
                self.secant(n - 2),
                self.secant(n - 3),
            );
        }

        let (h0, h1) = (self.width(k - 1), self.width(k));
        let (d0, d1) = (self.secant(k - 1), self.secant(k));
        if d0 * d1 <= 0.0 {
            return 0.0;
        }
        // Weighted harmonic mean of the neighbouring secants.
        let w1 = 2.0 * h1 + h0;
        let w2 = h1 + 2.0 * h0;
        (w1 + w2) / (w1 / d0 + w2 / d1)
    }
}

/// Three-point end derivative, limited to keep the end segment monotone.
fn end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if d.signum() != d0.signum() {
        0.0
    } else if d0.signum() != d1.signum() && d.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        d
    }
}

/// Fails on the first pair of values that does not strictly increase.
pub(crate) fn check_strictly_increasing(axis: &'static str, values: &[f64]) -> Result<()> {
    match values.windows(2).position(|w| !(w[1] > w[0])) {
        None => Ok(()),
        Some(i) => Err(SaturnLsError::NonMonotonicTable {
            axis,
            index: i + 1,
            previous: values[i],
            current: values[i + 1],
        }),
    }
}
