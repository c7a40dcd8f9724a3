//! regression::linalg — `ndarray` ↔ `nalgebra` bridge and dense solves.
//!
//! Purpose
//! -------
//! Keep the crate's public surface in `ndarray` while delegating the two
//! decompositions the fitter needs to `nalgebra`:
//! - an SVD least-squares solve of `X·β = y` (rank-revealing, no normal
//!   equations), and
//! - a Cholesky inverse of the Gram matrix `XᵀX`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; the caller has already filtered NaN responses and
//!   rejected non-finite design entries.
//! - Rank is judged against [`rank_threshold`], LAPACK's default `rcond`
//!   scaled by `max(n, p) · σ_max`.
use crate::{
    numerical::rank_threshold,
    regression::errors::{RegressionError, RegressionResult},
};
use nalgebra::{Cholesky, DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Copy an `ndarray` matrix into a freshly allocated `DMatrix`.
pub(crate) fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = a.dim();
    let mut out = DMatrix::<f64>::zeros(nrows, ncols);
    // DMatrix is column-major; walk columns outermost.
    for j in 0..ncols {
        for i in 0..nrows {
            out[(i, j)] = a[[i, j]];
        }
    }
    out
}

pub(crate) fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Least-squares solution of `x·β = y` via SVD.
///
/// Errors
/// ------
/// - `RegressionError::RankDeficient` when the numerical rank is below
///   `x.ncols()`.
/// - `RegressionError::LeastSquaresFailed` if the backend solve fails.
pub(crate) fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> RegressionResult<Array1<f64>> {
    let (n, p) = x.dim();
    let svd = to_dmatrix(x).svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let eps = rank_threshold(n, p, sigma_max);
    let rank = svd.rank(eps);
    if rank < p {
        return Err(RegressionError::RankDeficient { rank, num_predictors: p });
    }
    let rhs = DVector::from_iterator(n, y.iter().copied());
    let beta = svd
        .solve(&rhs, eps)
        .map_err(|reason| RegressionError::LeastSquaresFailed { reason: reason.to_string() })?;
    Ok(Array1::from_iter(beta.iter().copied()))
}

/// `(XᵀX)⁻¹` via Cholesky.
///
/// Errors
/// ------
/// - `RegressionError::SingularGram` if `XᵀX` is not positive definite.
pub(crate) fn gram_inverse(x: &Array2<f64>) -> RegressionResult<Array2<f64>> {
    let gram = to_dmatrix(&x.t().dot(x));
    let chol = Cholesky::new(gram).ok_or(RegressionError::SingularGram)?;
    Ok(to_array2(&chol.inverse()))
}
