//! inference::hac — HAC covariance of average OLS scores.
//!
//! Purpose
//! -------
//! Build HAC (Heteroskedasticity & Autocorrelation Consistent) covariance
//! matrices of the *average* per-observation OLS score `g_i = x_i · e_i`,
//! which feed the sandwich covariance in [`crate::inference::sandwich`].
//! The estimator is
//!
//! ```text
//! S  =  Γ₀  +  ∑_{k=1}^{L} w_k ( Γ_k + Γ_kᵀ ),
//! Γ₀ = (1/n) GᵀG,
//! Γ_k = c_k · G_{k:}ᵀ G_{:n−k},
//! ```
//!
//! with `c_k = 1/(n − k)` when the Newey–West small-sample correction is on
//! and `c_k = 1/n` otherwise.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows of the score matrix follow the order in which observations were
//!   stacked. For event-study designs that is `(offset, event_time)`
//!   order, so lags run across events within one offset block.
//! - Bandwidth is always truncated to `L ≤ n−1`.
//! - Empty score matrices are rejected with
//!   [`InferenceError::EmptyScores`] instead of panicking.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults, the IID reduction to `(1/n) GᵀG`, symmetry,
//!   centering invariance for mean-zero scores, a hand-computed Bartlett
//!   example and the empty-input error.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::KernelType,
};
use ndarray::{Array2, Axis, s};
use std::{borrow::Cow, cmp::min};

/// HACOptions — configuration for HAC score covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: [`KernelType`]
///   Kernel family for the HAC estimator.
/// - `bandwidth`: `Option<usize>`
///   Fixed bandwidth `L` (truncated to `n−1`), or `None` for the plug-in
///   rule [`KernelType::optimal_bandwidth`].
/// - `center`: `bool`
///   Demean score columns before bandwidth selection and aggregation.
/// - `small_sample_correction`: `bool`
///   Use `c_k = 1/(n−k)` instead of `c_k = 1/n`.
///
/// Notes
/// -----
/// - `Default` is Bartlett, plug-in bandwidth, no centering, Newey–West
///   correction on.
#[derive(Debug, Clone, PartialEq)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    /// Construct a `HACOptions` value from explicit settings.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_event_study::inference::{HACOptions, KernelType};
    /// let opts = HACOptions::new(Some(4), KernelType::Parzen, true, false);
    /// assert_eq!(opts.bandwidth, Some(4));
    /// ```
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }
}

impl Default for HACOptions {
    fn default() -> Self {
        Self {
            bandwidth: None,
            kernel: KernelType::Bartlett,
            center: false,
            small_sample_correction: true,
        }
    }
}

/// Build the `p×p` HAC covariance of the average score.
///
/// Parameters
/// ----------
/// - `hac_opts`: `&HACOptions`
///   Kernel, bandwidth, centering and small-sample policy.
/// - `raw_scores`: `&Array2<f64>`
///   `n×p` score matrix, `n ≥ 1`.
///
/// Returns
/// -------
/// `InferenceResult<Array2<f64>>`
///   Symmetric `p×p` matrix. With an effective bandwidth of zero this is the
///   IID outer product `(1/n) GᵀG`.
///
/// Errors
/// ------
/// - `InferenceError::EmptyScores` when `raw_scores` has no rows.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_event_study::inference::{HACOptions, KernelType, calculate_avg_scores_cov};
/// let scores = array![[1.0, -1.0], [0.5, -0.5], [1.5, -1.5]];
/// let opts = HACOptions::new(Some(1), KernelType::Bartlett, false, true);
/// let s = calculate_avg_scores_cov(&opts, &scores).unwrap();
/// assert_eq!(s.shape(), &[2, 2]);
/// ```
pub fn calculate_avg_scores_cov(
    hac_opts: &HACOptions, raw_scores: &Array2<f64>,
) -> InferenceResult<Array2<f64>> {
    let n = raw_scores.nrows();
    let p = raw_scores.ncols();

    let scores: Cow<'_, Array2<f64>> = if hac_opts.center {
        let col_means = raw_scores.mean_axis(Axis(0)).ok_or(InferenceError::EmptyScores)?;
        Cow::Owned(raw_scores - &col_means)
    } else {
        if n == 0 {
            return Err(InferenceError::EmptyScores);
        }
        Cow::Borrowed(raw_scores)
    };

    let bandwidth = match hac_opts.bandwidth {
        Some(bw) => min(bw, n - 1),
        None => min(hac_opts.kernel.optimal_bandwidth(scores.as_ref()), n - 1),
    };

    let mut avg_scores = Array2::<f64>::zeros((p, p));
    for lag in 0..=bandwidth {
        add_hac_component(&mut avg_scores, scores.as_ref(), lag, bandwidth, hac_opts);
    }
    Ok(avg_scores)
}

// ---- Helper methods ----

/// Add lag `lag`'s contribution to the accumulator: `(1/n) GᵀG` at lag 0,
/// `w_k (Γ_k + Γ_kᵀ)` otherwise. Requires `lag ≤ bandwidth ≤ n−1`.
fn add_hac_component(
    avg_scores: &mut Array2<f64>, scores: &Array2<f64>, lag: usize, bandwidth: usize,
    hac_opts: &HACOptions,
) {
    let n = scores.nrows();
    if lag == 0 {
        avg_scores.scaled_add(1.0 / (n as f64), &scores.t().dot(scores));
        return;
    }
    let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    if weight == 0.0 {
        return;
    }
    let scale = if hac_opts.small_sample_correction {
        1.0 / ((n - lag) as f64)
    } else {
        1.0 / (n as f64)
    };
    let lagged = scores.slice(s![lag.., ..]);
    let leading = scores.slice(s![..n - lag, ..]);
    let gamma_k = scale * lagged.t().dot(&leading);
    avg_scores.scaled_add(weight, &gamma_k);
    avg_scores.scaled_add(weight, &gamma_k.t());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `HACOptions` defaults.
    // - IID reduction, symmetry, centering invariance and a hand-computed
    //   Bartlett example for `calculate_avg_scores_cov`.
    //
    // They intentionally DO NOT cover:
    // - The AR(1) plug-in bandwidth; every test fixes the bandwidth.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn assert_matrices_close(a: &Array2<f64>, b: &Array2<f64>) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = TOL, max_relative = TOL);
        }
    }

    #[test]
    fn hacoptions_default_matches_documented_defaults() {
        let opts = HACOptions::default();
        assert!(opts.bandwidth.is_none());
        assert_eq!(opts.kernel, KernelType::Bartlett);
        assert!(!opts.center);
        assert!(opts.small_sample_correction);
    }

    #[test]
    // Purpose
    // -------
    // With `L = 0` the estimator is the IID outer product `(1/n) GᵀG`.
    fn zero_bandwidth_reduces_to_outer_product() {
        // Arrange
        let scores = array![[1.0, 2.0], [-1.0, 0.5], [0.5, -1.5], [2.0, 1.0]];
        let opts = HACOptions::new(Some(0), KernelType::Bartlett, false, true);

        // Act
        let s = calculate_avg_scores_cov(&opts, &scores).unwrap();

        // Assert
        let expected = scores.t().dot(&scores) / 4.0;
        assert_matrices_close(&s, &expected);
    }

    #[test]
    // Purpose
    // -------
    // Check the textbook Bartlett formula on a one-column example.
    //
    // Given
    // -----
    // - g = [1, 2, 3], L = 1, NW correction on.
    //
    // Expect
    // ------
    // - Γ₀ = 14/3, Γ₁ = (2·1 + 3·2)/2 = 4, w₁ = 1 − 1/2 = 0.5,
    //   S = 14/3 + 0.5·(4 + 4) = 26/3.
    fn bartlett_matches_hand_computation() {
        let scores = array![[1.0], [2.0], [3.0]];
        let opts = HACOptions::new(Some(1), KernelType::Bartlett, false, true);

        let s = calculate_avg_scores_cov(&opts, &scores).unwrap();

        assert_relative_eq!(s[[0, 0]], 26.0 / 3.0, epsilon = TOL);
    }

    #[test]
    fn result_is_symmetric_and_centering_is_noop_for_mean_zero_scores() {
        let scores = array![[1.0, -2.0], [-1.0, 1.0], [2.0, 0.5], [-2.0, 0.5]];
        let plain = HACOptions::new(Some(2), KernelType::Parzen, false, false);
        let centered = HACOptions { center: true, ..plain.clone() };

        let s_plain = calculate_avg_scores_cov(&plain, &scores).unwrap();
        let s_centered = calculate_avg_scores_cov(&centered, &scores).unwrap();

        assert_relative_eq!(s_plain[[0, 1]], s_plain[[1, 0]], epsilon = TOL);
        assert_matrices_close(&s_plain, &s_centered);
    }

    #[test]
    fn empty_scores_are_rejected() {
        let scores = Array2::<f64>::zeros((0, 2));
        for center in [false, true] {
            let opts = HACOptions::new(Some(1), KernelType::Bartlett, center, true);
            assert_eq!(
                calculate_avg_scores_cov(&opts, &scores),
                Err(InferenceError::EmptyScores)
            );
        }
    }
}
