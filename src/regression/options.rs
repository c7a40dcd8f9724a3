//! regression::options — covariance policy for the OLS fitter.
//!
//! [`RegressionOptions`] selects between the classical covariance
//! `σ̂²(XᵀX)⁻¹`, which is always reported, and an additional HAC sandwich
//! covariance computed by [`crate::inference`]. The default is classical
//! only, matching the plain `regression` entry point.
use crate::inference::HACOptions;

/// Which coefficient covariance to report alongside the classical one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CovarianceType {
    /// Homoskedastic `σ̂²(XᵀX)⁻¹` only.
    #[default]
    Classical,
    /// Also report the HAC sandwich covariance with these settings.
    Hac(HACOptions),
}

/// RegressionOptions — configuration for [`crate::regression::regression_with_options`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegressionOptions {
    pub covariance: CovarianceType,
}

impl RegressionOptions {
    pub fn new(covariance: CovarianceType) -> RegressionOptions {
        RegressionOptions { covariance }
    }

    /// Classical plus HAC covariance.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_event_study::inference::HACOptions;
    /// # use rust_event_study::regression::{CovarianceType, RegressionOptions};
    /// let opts = RegressionOptions::hac(HACOptions::default());
    /// assert!(matches!(opts.covariance, CovarianceType::Hac(_)));
    /// ```
    pub fn hac(hac_opts: HACOptions) -> RegressionOptions {
        RegressionOptions { covariance: CovarianceType::Hac(hac_opts) }
    }
}
