use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Pivots smaller than this (relative to the largest entry of the matrix)
/// make the system singular
const SINGULAR_THRESHOLD: f64 = 1e-12;

/// Solve the square linear system `matrix · x = rhs` using Gaussian
/// elimination with partial pivoting.
///
/// Returns `None` if the matrix is singular (or close enough to singular that
/// the solution would be meaningless).
#[allow(clippy::needless_range_loop)]
pub(crate) fn solve(matrix: ArrayView2<f64>, rhs: ArrayView1<f64>) -> Option<Array1<f64>> {
    let n = matrix.nrows();
    debug_assert_eq!(matrix.ncols(), n);
    debug_assert_eq!(rhs.len(), n);

    let mut a: Array2<f64> = matrix.to_owned();
    let mut b: Array1<f64> = rhs.to_owned();

    let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return if n == 0 { Some(b) } else { None };
    }

    for k in 0..n {
        // find the pivot
        let mut pivot = k;
        for i in (k + 1)..n {
            if a[[i, k]].abs() > a[[pivot, k]].abs() {
                pivot = i;
            }
        }

        if a[[pivot, k]].abs() < SINGULAR_THRESHOLD * scale {
            return None;
        }

        if pivot != k {
            for j in 0..n {
                a.swap([k, j], [pivot, j]);
            }
            b.swap(k, pivot);
        }

        // eliminate below the pivot
        for i in (k + 1)..n {
            let factor = a[[i, k]] / a[[k, k]];
            if factor == 0.0 {
                continue;
            }
            a[[i, k]] = 0.0;
            for j in (k + 1)..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    // back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[[i, j]] * x[j];
        }
        x[i] = sum / a[[i, i]];
    }

    return Some(x);
}
