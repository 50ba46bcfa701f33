//! Ordinary least squares solver.
//!
//! The grade predictor solves a small linear regression problem:
//!
//! ```text
//! minimize Σ (y_i - b0 - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - The intercept is an explicit column of ones in the design matrix.
//! - We solve with SVD so tall, short and rank-deficient systems all work
//!   (nalgebra's `QR::solve` is intended for square systems).
//!   Rank-deficient inputs get the minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ b0 + x·β` and return `(b0, β)`.
///
/// Every row of `rows` must have the same width. Returns `None` for empty or
/// ragged input, or when the solve fails.
pub fn fit_with_intercept(rows: &[Vec<f64>], targets: &[f64]) -> Option<(f64, Vec<f64>)> {
    let n = rows.len();
    if n == 0 || n != targets.len() {
        return None;
    }
    let width = rows[0].len();
    if rows.iter().any(|r| r.len() != width) {
        return None;
    }

    let x = DMatrix::from_fn(n, width + 1, |i, j| if j == 0 { 1.0 } else { rows[i][j - 1] });
    let y = DVector::from_column_slice(targets);

    let beta = solve_least_squares(&x, &y)?;
    let intercept = beta[0];
    let coefficients = beta.iter().skip(1).copied().collect();
    Some((intercept, coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn intercept_fit_recovers_plane() {
        // y = 5 + 0.5*a + 0.25*b - 1.0*c
        let rows = vec![
            vec![60.0, 70.0, 80.0],
            vec![70.0, 65.0, 90.0],
            vec![55.0, 80.0, 75.0],
            vec![90.0, 85.0, 70.0],
            vec![40.0, 50.0, 60.0],
        ];
        let targets: Vec<f64> = rows
            .iter()
            .map(|r| 5.0 + 0.5 * r[0] + 0.25 * r[1] - r[2])
            .collect();

        let (b0, beta) = fit_with_intercept(&rows, &targets).unwrap();
        assert!((b0 - 5.0).abs() < 1e-6, "intercept {b0}");
        assert!((beta[0] - 0.5).abs() < 1e-8);
        assert!((beta[1] - 0.25).abs() < 1e-8);
        assert!((beta[2] + 1.0).abs() < 1e-8);
    }

    #[test]
    fn intercept_fit_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(fit_with_intercept(&rows, &[1.0, 2.0]).is_none());
        assert!(fit_with_intercept(&[], &[]).is_none());
    }
}
