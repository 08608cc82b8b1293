//! The masked running-average smoothing core.
//!
//! [`running_average()`] computes a centered moving average over a
//! [`Series`], with three behaviors that distinguish it from a plain
//! convolution:
//!
//!  1. Masked sites are excluded from both the window sum and the per-window
//!     valid-count normalizer.
//!  2. Window truncation at the series edges is bias-corrected, so the
//!     output always has the same length as the input.
//!  3. An output site is flagged invalid when the number of valid sites in
//!     its window falls below `window_size * min_valid_fraction`.
//!
//! The two [`Series`] variants take structurally different paths. For a
//! [`Series::Plain`], the nominal divisor is `window_size` everywhere and
//! the window *sums* are rescaled at the edges to make up for the implicit
//! zero padding; every output site is valid. For a [`Series::Masked`], the
//! divisor is the windowed count of valid sites, which already accounts for
//! both masking and edge truncation. The paths agree numerically on
//! all-valid input; they differ in which output sites are flagged valid
//! (the masked path flags truncated edge windows invalid, the plain path
//! does not).
//!
//! [`Series`]: crate::series::Series

use ndarray::Array1;
use num_traits::{Float, FromPrimitive};

use crate::error::GSmoothError;
use crate::series::Series;

/// The default fraction of valid sites a window needs before its output
/// site is kept.
pub const DEFAULT_MIN_VALID_FRACTION: f64 = 0.95;

/// The output of [`running_average()`]: smoothed per-site values with a
/// parallel validity flag, the same length as the input series.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothedSeries<F: Float> {
    values: Array1<F>,
    valid: Array1<bool>,
}

impl<F: Float> SmoothedSeries<F> {
    /// The smoothed values. Values at invalid sites may be non-finite and
    /// should not be consumed without checking [`SmoothedSeries::valid`].
    pub fn values(&self) -> &Array1<F> {
        &self.values
    }

    /// The per-site validity flags.
    pub fn valid(&self) -> &Array1<bool> {
        &self.valid
    }

    /// The number of sites.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return whether this result has no sites.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of sites flagged invalid.
    pub fn n_invalid(&self) -> usize {
        self.valid.iter().filter(|flag| !**flag).count()
    }

    /// Iterate over `(value, valid)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (F, bool)> + '_ {
        self.values
            .iter()
            .copied()
            .zip(self.valid.iter().copied())
    }

    /// The smoothed values with invalid sites replaced by `None`.
    pub fn masked_values(&self) -> Vec<Option<F>> {
        self.iter()
            .map(|(value, flag)| if flag { Some(value) } else { None })
            .collect()
    }
}

/// Centered same-mode sliding-window sum: output site `i` sums input sites
/// `[i - h, i + window_size - 1 - h]` with `h = window_size / 2`, truncated
/// at the array bounds (as if the input were zero-padded outside its range).
/// The output length equals the input length for any window size.
fn window_sum<F: Float>(input: &Array1<F>, window_size: usize) -> Array1<F> {
    let n = input.len();
    let half = window_size / 2;
    let mut sums = Array1::zeros(n);
    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + window_size - half).min(n);
        let mut total = F::zero();
        for j in start..end {
            total = total + input[j];
        }
        sums[i] = total;
    }
    sums
}

/// Rescale the leading and trailing window sums of a uniformly-valid series
/// to correct for the implicit zero padding beyond the series bounds.
///
/// A truncated window holds fewer than `window_size` real sites, so its raw
/// sum undercounts; each affected sum is scaled by `window_size` over the
/// number of real sites in that window. Note that this scales the sums while
/// the nominal divisor stays `window_size` — the correction factors differ
/// by window-size parity. Scale ranges are truncated to the series length,
/// so very large windows degrade rather than fail.
fn fix_edge_sums<F>(sums: &mut Array1<F>, window_size: usize)
where
    F: Float + FromPrimitive,
{
    let n = sums.len();
    let ws = window_size;
    let half = ws / 2;
    let ws_f = F::from_usize(ws).unwrap();
    if ws % 2 == 0 {
        // leading windows hold half + k real sites
        for k in 0..half.min(n) {
            sums[k] = sums[k] * ws_f / F::from_usize(half + k).unwrap();
        }
        // trailing windows hold ws - 1 down to half + 1 real sites; the
        // last window already holds half + 1 sites so only half - 1
        // positions need fixing
        if half > 1 {
            let tail = half - 1;
            for t in 0..tail {
                if let Some(i) = (n + t).checked_sub(tail) {
                    sums[i] = sums[i] * ws_f / F::from_usize(ws - 1 - t).unwrap();
                }
            }
        }
    } else {
        // leading windows hold half + 1 + k real sites
        for k in 0..half.min(n) {
            sums[k] = sums[k] * ws_f / F::from_usize(half + 1 + k).unwrap();
        }
        // trailing half + 1 positions, with real-site counts ws down to
        // half + 1 (the first factor is ws/ws, a deliberate no-op)
        let tail = ws - half;
        for t in 0..tail {
            if let Some(i) = (n + t).checked_sub(tail) {
                sums[i] = sums[i] * ws_f / F::from_usize(ws - t).unwrap();
            }
        }
    }
}

/// Compute a masked running average over `series`.
///
/// Output site `i` is the average of the valid observations in the length
/// `window_size` window centered on `i` (for even window sizes, the window
/// extends one site further left than right). The output is the same length
/// as the input; truncated edge windows are bias-corrected rather than
/// dropped. Output site `i` is flagged valid when its window holds at least
/// `window_size * min_valid_fraction` valid sites — except for a
/// [`Series::Plain`] input, where every output site is valid.
///
/// A window with no valid sites produces a non-finite value flagged
/// invalid; this is not an error.
///
/// # Arguments
/// * `series` - the observations to smooth.
/// * `window_size` - the number of sites the moving average considers;
///   must be positive.
/// * `min_valid_fraction` - the smallest valid fraction of a kept window,
///   in (0, 1]; see [`DEFAULT_MIN_VALID_FRACTION`].
///
/// # Examples
///
/// ```
/// use gsmooth::prelude::*;
///
/// let series = Series::from_options(&[Some(2.0), Some(4.0), None, Some(4.0)]);
/// let smoothed = running_average(&series, 2, 0.95).unwrap();
/// assert_eq!(smoothed.len(), 4);
/// // the window over sites 0 and 1 holds two valid sites
/// assert_eq!(smoothed.values()[1], 3.0);
/// assert!(smoothed.valid()[1]);
/// // the window over sites 1 and 2 holds one valid site out of two
/// assert!(!smoothed.valid()[2]);
/// ```
pub fn running_average<F>(
    series: &Series<F>,
    window_size: usize,
    min_valid_fraction: f64,
) -> Result<SmoothedSeries<F>, GSmoothError>
where
    F: Float + FromPrimitive,
{
    if window_size == 0 {
        return Err(GSmoothError::InvalidWindowSize(window_size));
    }
    if !(min_valid_fraction > 0.0 && min_valid_fraction <= 1.0) {
        return Err(GSmoothError::InvalidValidFraction(min_valid_fraction));
    }
    let n = series.len();
    if n == 0 {
        return Ok(SmoothedSeries {
            values: Array1::zeros(0),
            valid: Array1::from_vec(Vec::new()),
        });
    }

    let ws = window_size;
    let ws_f = F::from_usize(ws).unwrap();

    match series {
        Series::Plain(observations) => {
            let mut sums = window_sum(observations, ws);
            fix_edge_sums(&mut sums, ws);
            let values = sums.mapv(|sum| sum / ws_f);
            // the nominal divisor ws always meets the threshold
            let valid = Array1::from_elem(n, true);
            Ok(SmoothedSeries { values, valid })
        }
        Series::Masked {
            values: observations,
            valid: flags,
        } => {
            let filled: Array1<F> = observations
                .iter()
                .zip(flags.iter())
                .map(|(&value, &flag)| if flag { value } else { F::zero() })
                .collect();
            let indicator: Array1<F> = flags
                .iter()
                .map(|&flag| if flag { F::one() } else { F::zero() })
                .collect();
            let sums = window_sum(&filled, ws);
            let counts = window_sum(&indicator, ws);

            // a zero count gives a non-finite value here, flagged invalid below
            let values: Array1<F> = sums
                .iter()
                .zip(counts.iter())
                .map(|(&sum, &count)| sum / count)
                .collect();
            let threshold = F::from_f64(ws as f64 * min_valid_fraction).unwrap();
            let valid = counts.mapv(|count| count >= threshold);
            Ok(SmoothedSeries { values, valid })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{random_masked_series, random_plain_series};

    fn assert_approx_eq(left: f64, right: f64) {
        assert!(
            (left - right).abs() < 1e-12,
            "{} != {} (tolerance 1e-12)",
            left,
            right
        );
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_length_invariant() {
        for n in [1, 2, 7, 100] {
            for ws in [1, 2, 3, 4, 10] {
                let plain = random_plain_series(n);
                let smoothed = running_average(&plain, ws, 0.95).unwrap();
                assert_eq!(smoothed.values().len(), n);
                assert_eq!(smoothed.valid().len(), n);

                let masked = random_masked_series(n, 0.2);
                let smoothed = running_average(&masked, ws, 0.95).unwrap();
                assert_eq!(smoothed.values().len(), n);
                assert_eq!(smoothed.valid().len(), n);
            }
        }
    }

    #[test]
    fn test_constant_plain_series() {
        let series = Series::from_vec(vec![5.0; 20]);
        let smoothed = running_average(&series, 4, 0.95).unwrap();
        for (value, flag) in smoothed.iter() {
            assert_approx_eq(value, 5.0);
            assert!(flag);
        }
    }

    #[test]
    fn test_constant_plain_series_odd_window() {
        let series = Series::from_vec(vec![5.0; 20]);
        let smoothed = running_average(&series, 5, 0.95).unwrap();
        for (value, flag) in smoothed.iter() {
            assert_approx_eq(value, 5.0);
            assert!(flag);
        }
    }

    #[test]
    fn test_odd_window_edge_correction() {
        // hand-computed for [0, 1, ..., 9] and ws = 3: each output is the
        // mean of the real sites in the truncated window [i-1, i+1]
        let series = Series::from_vec(ramp(10));
        let smoothed = running_average(&series, 3, 0.95).unwrap();
        let expected = [0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 8.5];
        for (i, &value) in expected.iter().enumerate() {
            assert_approx_eq(smoothed.values()[i], value);
            assert!(smoothed.valid()[i]);
        }
    }

    #[test]
    fn test_even_window_edge_correction() {
        // ws = 4 windows cover [i-2, i+1]; hand-computed truncated means
        let series = Series::from_vec(ramp(10));
        let smoothed = running_average(&series, 4, 0.95).unwrap();
        let expected = [0.5, 1.0, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.0];
        for (i, &value) in expected.iter().enumerate() {
            assert_approx_eq(smoothed.values()[i], value);
        }
    }

    #[test]
    fn test_fully_masked_window() {
        // sites 5..15 masked; the ws = 5 window at site 10 is all masked
        let values = vec![1.0; 20];
        let valid: Vec<bool> = (0..20).map(|i| !(5..15).contains(&i)).collect();
        let series = Series::from_parts(values, valid).unwrap();
        let smoothed = running_average(&series, 5, 0.5).unwrap();
        assert!(smoothed.values()[10].is_nan());
        assert!(!smoothed.valid()[10]);
        assert_eq!(smoothed.masked_values()[10], None);
    }

    #[test]
    fn test_threshold_boundary() {
        // ws = 10 and fraction 0.95 require >= 9.5, so an integral count
        // of 9 must fail and 10 must pass
        let values = vec![1.0; 30];
        let valid: Vec<bool> = (0..30).map(|i| i != 15).collect();
        let series = Series::from_parts(values, valid).unwrap();
        let smoothed = running_average(&series, 10, 0.95).unwrap();
        // windows [i-5, i+4] contain the masked site 15 for 11 <= i <= 20
        assert!(smoothed.valid()[10]);
        for i in 11..=20 {
            assert!(!smoothed.valid()[i], "site {} should be invalid", i);
            assert_approx_eq(smoothed.values()[i], 1.0);
        }
        assert!(smoothed.valid()[21]);
    }

    #[test]
    fn test_masked_edges_flagged_invalid() {
        // truncated edge windows of a masked series hold fewer than
        // ws * 0.95 valid sites, unlike the plain path
        let series = Series::from_parts(vec![1.0; 30], vec![true; 30]).unwrap();
        let smoothed = running_average(&series, 10, 0.95).unwrap();
        assert!(!smoothed.valid()[0]);
        assert!(!smoothed.valid()[4]);
        assert!(smoothed.valid()[5]);
        assert!(smoothed.valid()[25]);
        assert!(!smoothed.valid()[26]);
        assert!(!smoothed.valid()[29]);
    }

    #[test]
    fn test_plain_and_all_valid_masked_agree() {
        // the edge-corrected sum over the nominal divisor is algebraically
        // the sum over the true count, so values agree everywhere
        let plain = Series::from_vec(ramp(25));
        let masked = Series::from_parts(ramp(25), vec![true; 25]).unwrap();
        for ws in [2, 3, 4, 5, 8, 9] {
            let from_plain = running_average(&plain, ws, 0.95).unwrap();
            let from_masked = running_average(&masked, ws, 0.95).unwrap();
            for i in 0..25 {
                assert_approx_eq(from_plain.values()[i], from_masked.values()[i]);
            }
        }
    }

    #[test]
    fn test_empty_series() {
        let series: Series<f64> = Series::from_vec(vec![]);
        let smoothed = running_average(&series, 4, 0.95).unwrap();
        assert!(smoothed.is_empty());
        assert_eq!(smoothed.valid().len(), 0);
    }

    #[test]
    fn test_invalid_window_size() {
        let series = Series::from_vec(vec![1.0, 2.0]);
        let result = running_average(&series, 0, 0.95);
        assert!(matches!(result, Err(GSmoothError::InvalidWindowSize(0))));
    }

    #[test]
    fn test_invalid_valid_fraction() {
        let series = Series::from_vec(vec![1.0, 2.0]);
        for fraction in [1.5, 0.0, -0.1, f64::NAN] {
            let result = running_average(&series, 2, fraction);
            assert!(
                matches!(result, Err(GSmoothError::InvalidValidFraction(_))),
                "fraction {} should be rejected",
                fraction
            );
        }
    }

    #[test]
    fn test_unit_window_is_identity() {
        let series = Series::from_vec(ramp(8));
        let smoothed = running_average(&series, 1, 0.95).unwrap();
        for i in 0..8 {
            assert_approx_eq(smoothed.values()[i], i as f64);
            assert!(smoothed.valid()[i]);
        }
    }

    #[test]
    fn test_unit_window_masked() {
        let series = Series::from_options(&[Some(3.0), None, Some(5.0)]);
        let smoothed = running_average(&series, 1, 0.95).unwrap();
        assert_approx_eq(smoothed.values()[0], 3.0);
        assert!(smoothed.valid()[0]);
        assert!(smoothed.values()[1].is_nan());
        assert!(!smoothed.valid()[1]);
    }

    #[test]
    fn test_oversized_window_degrades() {
        // ws > n: no window can meet the threshold, so every output of a
        // masked series is flagged invalid
        let series = Series::from_parts(vec![1.0; 3], vec![true; 3]).unwrap();
        let smoothed = running_average(&series, 7, 0.95).unwrap();
        assert_eq!(smoothed.len(), 3);
        assert_eq!(smoothed.n_invalid(), 3);
    }

    #[test]
    fn test_f32_series() {
        let series: Series<f32> = Series::from_vec(vec![5.0_f32; 12]);
        let smoothed = running_average(&series, 3, 0.95).unwrap();
        for (value, flag) in smoothed.iter() {
            assert!((value - 5.0).abs() < 1e-6);
            assert!(flag);
        }
    }
}
