use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::Error;
use super::linalg::solve;

/// Compute the barycentric coordinates of all rows of `points` with respect
/// to the `simplex`.
///
/// In `n` dimensions, `simplex` must contain `n + 1` vertices (one per row)
/// and `points` must contain `n` columns. The output contains one row of
/// `n + 1` weights for each point. The weights sum to 1, and the sum of the
/// vertices multiplied by the weights is the point.
pub fn barycentric_coords(points: ArrayView2<f64>, simplex: ArrayView2<f64>) -> Result<Array2<f64>, Error> {
    let dimension = check_simplex(simplex)?;
    if points.ncols() != dimension {
        return Err(Error::InvalidParameter(format!(
            "expected points in {} dimensions for this simplex, got {} dimensions",
            dimension, points.ncols()
        )));
    }

    let last = simplex.row(dimension);
    // column `i` of this matrix is the i-th vertex relative to the last one
    let mut edges = Array2::zeros((dimension, dimension));
    for (i, vertex) in simplex.slice(s![..dimension, ..]).outer_iter().enumerate() {
        for k in 0..dimension {
            edges[[k, i]] = vertex[k] - last[k];
        }
    }

    let mut weights = Array2::zeros((points.nrows(), dimension + 1));
    for (point, mut output) in points.outer_iter().zip(weights.axis_iter_mut(Axis(0))) {
        let relative = &point - &last;
        let solution = solve(edges.view(), relative.view()).ok_or_else(|| Error::InvalidParameter(
            "the simplex is degenerate, its vertices are not affinely independent".into()
        ))?;

        output.slice_mut(s![..dimension]).assign(&solution);
        output[dimension] = 1.0 - solution.sum();
    }

    return Ok(weights);
}

/// Compute the barycentric coordinates of a single `point` with respect to
/// the `simplex`. See [`barycentric_coords`] for more information.
pub fn barycentric_coords_single(point: ArrayView1<f64>, simplex: ArrayView2<f64>) -> Result<Array1<f64>, Error> {
    let points = point.insert_axis(Axis(0));
    let weights = barycentric_coords(points, simplex)?;
    return Ok(weights.row(0).to_owned());
}

/// Check the shape of the simplex, and get the dimension of the space
fn check_simplex(simplex: ArrayView2<f64>) -> Result<usize, Error> {
    let dimension = simplex.ncols();
    if dimension == 0 || simplex.nrows() != dimension + 1 {
        return Err(Error::InvalidParameter(format!(
            "a simplex in {} dimensions needs {} vertices, got {}",
            dimension, dimension + 1, simplex.nrows()
        )));
    }

    if simplex.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter("the simplex contains non-finite values".into()));
    }

    return Ok(dimension);
}
