use log::debug;

use crate::{Error, Matrix3, Vector3D};

/// Points on the boundary of the supercell closer than this are attributed to
/// the lower face only
const BOUNDARY_EPSILON: f64 = 1e-10;

/// Get all the points of the original lattice inside the supercell defined by
/// the integer `transform` matrix, in fractional coordinates of the supercell.
///
/// The rows of `transform` are the supercell lattice vectors, expressed in
/// fractional coordinates of the original lattice. All returned coordinates
/// are in `[0, 1)` (up to a tolerance of 1e-10), and there are exactly
/// `|det(transform)|` of them.
pub fn lattice_points_in_supercell(transform: &[[i32; 3]; 3]) -> Result<Vec<Vector3D>, Error> {
    let determinant = integer_determinant(transform);
    if determinant == 0 {
        return Err(Error::InvalidTransform(format!(
            "the supercell matrix {:?} is singular", transform
        )));
    }

    // bounding box of the supercell in the original lattice, using the 8
    // corners of the supercell
    let mut mins = [0_i64; 3];
    let mut maxs = [0_i64; 3];
    for corner in 0..8_usize {
        let mut point = [0_i64; 3];
        for (row, vector) in transform.iter().enumerate() {
            if corner & (1 << row) != 0 {
                for k in 0..3 {
                    point[k] += vector[k] as i64;
                }
            }
        }

        for k in 0..3 {
            mins[k] = mins[k].min(point[k]);
            maxs[k] = maxs[k].max(point[k]);
        }
    }
    debug!("looking for supercell lattice points between {:?} and {:?}", mins, maxs);

    let matrix = Matrix3::new([
        [transform[0][0] as f64, transform[0][1] as f64, transform[0][2] as f64],
        [transform[1][0] as f64, transform[1][1] as f64, transform[1][2] as f64],
        [transform[2][0] as f64, transform[2][1] as f64, transform[2][2] as f64],
    ]);
    // fractional coordinates are the row vector `p` times the inverse
    let to_fractional = matrix.inverse().transposed();

    let mut points = Vec::with_capacity(determinant.unsigned_abs() as usize);
    for a in mins[0]..=maxs[0] {
        for b in mins[1]..=maxs[1] {
            for c in mins[2]..=maxs[2] {
                let fractional = to_fractional * Vector3D::new(a as f64, b as f64, c as f64);
                let inside = (0..3).all(|k| {
                    fractional[k] >= -BOUNDARY_EPSILON && fractional[k] < 1.0 - BOUNDARY_EPSILON
                });

                if inside {
                    points.push(fractional);
                }
            }
        }
    }

    if points.len() as i64 != determinant.abs() {
        return Err(Error::InvalidTransform(format!(
            "expected {} lattice points in the supercell, found {}",
            determinant.abs(), points.len()
        )));
    }

    return Ok(points);
}

fn integer_determinant(m: &[[i32; 3]; 3]) -> i64 {
    let m = m.map(|row| row.map(i64::from));
    m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_range(points: &[Vector3D]) {
        for point in points {
            for k in 0..3 {
                assert!(point[k] >= -1e-10 && point[k] <= 1.0 - 1e-10, "{:?} is outside of the supercell", point);
            }
        }
    }

    #[test]
    fn determinant() {
        assert_eq!(integer_determinant(&[[1, 0, 0], [0, 1, 0], [0, 0, 1]]), 1);
        assert_eq!(integer_determinant(&[[1, 3, 5], [-3, 2, 3], [-5, 3, 1]]), -38);
        assert_eq!(integer_determinant(&[[-5, -5, -3], [0, -4, -2], [0, -5, -2]]), 10);
        assert_eq!(integer_determinant(&[[1, 2, 3], [2, 4, 6], [0, 0, 1]]), 0);
    }

    #[test]
    fn identity() {
        let points = lattice_points_in_supercell(&[[1, 0, 0], [0, 1, 0], [0, 0, 1]]).unwrap();
        assert_eq!(points, [Vector3D::zero()]);
    }

    #[test]
    fn diagonal() {
        let points = lattice_points_in_supercell(&[[2, 0, 0], [0, 2, 0], [0, 0, 2]]).unwrap();
        assert_eq!(points.len(), 8);
        for point in &points {
            for k in 0..3 {
                assert!(point[k] == 0.0 || point[k] == 0.5);
            }
        }
    }

    #[test]
    fn skewed() {
        let points = lattice_points_in_supercell(&[[1, 3, 5], [-3, 2, 3], [-5, 3, 1]]).unwrap();
        assert_eq!(points.len(), 38);
        check_range(&points);

        let points = lattice_points_in_supercell(&[[-5, -5, -3], [0, -4, -2], [0, -5, -2]]).unwrap();
        assert_eq!(points.len(), 10);
        check_range(&points);
    }

    #[test]
    fn singular() {
        let error = lattice_points_in_supercell(&[[1, 2, 3], [2, 4, 6], [0, 0, 1]]).unwrap_err();
        assert!(matches!(error, Error::InvalidTransform(_)));
    }
}
