//! Interpolation kernels over sampled signals.
//!
//! All kernels take a strictly increasing sample axis `xp` with aligned
//! values `fp` and clamp outside the sampled range; extrapolation policy is
//! the caller's business (see [`crate::Disturbances`]).

use mf_core::Real;
use serde::{Deserialize, Serialize};

/// Interpolation kind for a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interp {
    /// Piecewise-linear between bracketing samples.
    #[default]
    Linear,
    /// Zero-order hold: the most recent sample's value holds until the
    /// next sample time.
    Zoh,
}

impl Interp {
    /// Evaluate one query point with this kind.
    pub fn eval(self, x: Real, xp: &[Real], fp: &[Real]) -> Real {
        match self {
            Interp::Linear => linear(x, xp, fp),
            Interp::Zoh => zoh(x, xp, fp),
        }
    }

    /// Evaluate many query points with this kind.
    pub fn eval_slice(self, xs: &[Real], xp: &[Real], fp: &[Real]) -> Vec<Real> {
        xs.iter().map(|&x| self.eval(x, xp, fp)).collect()
    }
}

/// Index of the last sample with `xp[i] <= x`, or `None` if `x` precedes
/// the first sample.
fn floor_index(x: Real, xp: &[Real]) -> Option<usize> {
    let upper = xp.partition_point(|&v| v <= x);
    upper.checked_sub(1)
}

/// Piecewise-linear interpolation, clamped at both ends.
pub fn linear(x: Real, xp: &[Real], fp: &[Real]) -> Real {
    debug_assert_eq!(xp.len(), fp.len());
    let Some(i) = floor_index(x, xp) else {
        return fp[0];
    };
    if i + 1 >= xp.len() {
        return fp[fp.len() - 1];
    }
    let frac = (x - xp[i]) / (xp[i + 1] - xp[i]);
    fp[i] + frac * (fp[i + 1] - fp[i])
}

/// Zero-order hold: the value of the largest sample time `<= x`, clamped
/// to the first sample before the range.
pub fn zoh(x: Real, xp: &[Real], fp: &[Real]) -> Real {
    debug_assert_eq!(xp.len(), fp.len());
    match floor_index(x, xp) {
        Some(i) => fp[i],
        None => fp[0],
    }
}

/// Interval-averaged resampling onto a coarser axis.
///
/// Each output sample `i` is the mean of the `fp` samples falling in
/// `[x[i], x[i+1])`; an interval with no samples falls back to linear
/// interpolation at its left edge. The final point is interpolated
/// linearly.
pub fn averaged(xs: &[Real], xp: &[Real], fp: &[Real]) -> Vec<Real> {
    debug_assert_eq!(xp.len(), fp.len());
    let mut out = Vec::with_capacity(xs.len());
    for window in xs.windows(2) {
        let (lo, hi) = (window[0], window[1]);
        let mut sum = 0.0;
        let mut count = 0usize;
        for (&x, &f) in xp.iter().zip(fp) {
            if x >= lo && x < hi {
                sum += f;
                count += 1;
            }
        }
        if count > 0 {
            out.push(sum / count as Real);
        } else {
            out.push(linear(lo, xp, fp));
        }
    }
    if let Some(&last) = xs.last() {
        out.push(linear(last, xp, fp));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const XP: [Real; 3] = [0.0, 10.0, 20.0];
    const FP: [Real; 3] = [1.0, 2.0, 3.0];

    #[test]
    fn linear_brackets_and_clamps() {
        assert_eq!(linear(5.0, &XP, &FP), 1.5);
        assert_eq!(linear(10.0, &XP, &FP), 2.0);
        assert_eq!(linear(-1.0, &XP, &FP), 1.0);
        assert_eq!(linear(25.0, &XP, &FP), 3.0);
    }

    #[test]
    fn zoh_holds_until_next_sample() {
        assert_eq!(zoh(9.999, &XP, &FP), 1.0);
        assert_eq!(zoh(10.0, &XP, &FP), 2.0);
        assert_eq!(zoh(19.0, &XP, &FP), 2.0);
        assert_eq!(zoh(-1.0, &XP, &FP), 1.0);
        assert_eq!(zoh(99.0, &XP, &FP), 3.0);
    }

    #[test]
    fn zoh_handles_irregular_axis() {
        let xp = [0.0, 1.0, 100.0];
        let fp = [5.0, 6.0, 7.0];
        assert_eq!(zoh(50.0, &xp, &fp), 6.0);
        assert_eq!(zoh(0.5, &xp, &fp), 5.0);
    }

    #[test]
    fn kind_dispatch() {
        assert_eq!(Interp::Linear.eval(5.0, &XP, &FP), 1.5);
        assert_eq!(Interp::Zoh.eval(5.0, &XP, &FP), 1.0);
        assert_eq!(
            Interp::Zoh.eval_slice(&[0.0, 9.0, 10.0], &XP, &FP),
            vec![1.0, 1.0, 2.0]
        );
    }

    #[test]
    fn averaged_means_per_interval() {
        let xp: Vec<Real> = (0..10).map(|i| i as Real).collect();
        let fp: Vec<Real> = (0..10).map(|i| i as Real).collect();
        let out = averaged(&[0.0, 5.0, 9.0], &xp, &fp);
        // [0,5) -> mean(0..=4) = 2.0, [5,9) -> mean(5..=8) = 6.5, 9 -> 9.0
        assert_eq!(out, vec![2.0, 6.5, 9.0]);
    }

    #[test]
    fn averaged_empty_interval_falls_back_to_linear() {
        let xp = [0.0, 100.0];
        let fp = [0.0, 100.0];
        let out = averaged(&[10.0, 20.0, 30.0], &xp, &fp);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }
}
