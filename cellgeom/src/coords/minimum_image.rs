use log::{debug, warn};
use ndarray::{Array2, Array3, Axis};
use ndarray::parallel::prelude::*;

use crate::{Lattice, Points, Vector3D};

/// Above this number of periodic images, the lattice is extremely oblique and
/// the minimum image search becomes slow.
const MANY_IMAGES: usize = 10_000;

/// Largest number of translations checked along a single lattice vector
const MAX_SHELL: i32 = 50;

/// Wrap a fractional coordinate inside the unit cell, with all components in
/// `[0, 1)`.
#[inline]
pub(crate) fn wrap_fractional(fractional: Vector3D) -> Vector3D {
    fractional.map(|f| f - f64::floor(f))
}

/// Fast periodic difference between two fractional coordinates.
///
/// Each component of `first - second` is wrapped independently in
/// `[-0.5, 0.5)`. This is **not** the minimum image convention: for
/// non-orthogonal lattices, the Cartesian vector corresponding to the result
/// can be longer than the shortest vector between periodic images of the two
/// points. Use [`MinimumImage`] or [`pbc_shortest_vectors`] when the actual
/// shortest vector is required.
///
/// ```
/// # use cellgeom::coords::pbc_diff;
/// # use cellgeom::Vector3D;
/// # use approx::assert_ulps_eq;
/// let diff = pbc_diff(Vector3D::new(0.1, 0.1, 0.1), Vector3D::new(0.3, 0.5, 0.9));
/// assert_ulps_eq!(diff, Vector3D::new(-0.2, -0.4, 0.2), epsilon = 1e-12);
/// ```
pub fn pbc_diff(first: Vector3D, second: Vector3D) -> Vector3D {
    (first - second).map(|d| {
        let mut wrapped = d - f64::round(d);
        // f64::round goes away from zero on ties, and both ties have to end
        // up at -0.5
        if wrapped >= 0.5 {
            wrapped -= 1.0;
        } else if wrapped < -0.5 {
            wrapped += 1.0;
        }
        wrapped
    })
}

/// Shortest vectors between periodic images of points, using the minimum
/// image convention.
///
/// The search looks at all lattice translations `n` around the per-axis
/// wrapped difference between the two points, with `|n_i| <= floor(L |b_i| +
/// 1/2)`, where `b_i` are the reciprocal lattice vectors and `L` is the
/// length of the longest Cartesian vector with fractional components in
/// `[-1/2, 1/2]`. This covers the 27 closest images for most lattices, and
/// grows automatically for very oblique ones.
#[derive(Debug, Clone)]
pub struct MinimumImage {
    lattice: Lattice,
    /// largest translation to consider along each lattice vector
    shell: [i32; 3],
    /// Cartesian translations to check, the null translation comes first
    translations: Vec<Vector3D>,
}

impl MinimumImage {
    /// Create a new `MinimumImage` search for the given `lattice`
    pub fn new(lattice: &Lattice) -> MinimumImage {
        let mut longest = 0.0;
        for corner in [
            [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, 0.5, 0.5],
        ] {
            // the opposite corners have the same norm
            let cartesian = lattice.cartesian(Vector3D::from(corner));
            longest = f64::max(longest, cartesian.norm());
        }

        let reciprocal = lattice.reciprocal_lengths();
        let mut shell = [1; 3];
        for (i, (n_max, &reciprocal)) in shell.iter_mut().zip(&reciprocal).enumerate() {
            let n = f64::floor(longest * reciprocal + 0.5);
            if n > f64::from(MAX_SHELL) {
                warn!(
                    "the lattice is extremely oblique, minimum image search would need {} \
                    translations along lattice vector {}. Only {} will be used, and some \
                    distances might be overestimated. Consider using a reduced lattice instead",
                    n, i, MAX_SHELL
                );
                *n_max = MAX_SHELL;
            } else {
                *n_max = i32::max(n as i32, 1);
            }
        }

        let mut translations = vec![Vector3D::zero()];
        for n_a in -shell[0]..=shell[0] {
            for n_b in -shell[1]..=shell[1] {
                for n_c in -shell[2]..=shell[2] {
                    if n_a == 0 && n_b == 0 && n_c == 0 {
                        continue;
                    }
                    let shift = Vector3D::new(n_a as f64, n_b as f64, n_c as f64);
                    translations.push(lattice.cartesian(shift));
                }
            }
        }

        debug!("minimum image search uses {:?} shells ({} images)", shell, translations.len());
        if translations.len() > MANY_IMAGES {
            warn!(
                "the lattice is very oblique, minimum image search will look at {} periodic images. \
                Consider using a reduced lattice instead",
                translations.len()
            );
        }

        MinimumImage {
            lattice: *lattice,
            shell: shell,
            translations: translations,
        }
    }

    /// Get the lattice used by this search
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Get the maximal number of lattice translations considered along each
    /// lattice vector
    pub fn shell(&self) -> [i32; 3] {
        self.shell
    }

    /// Get the Cartesian vector going from `from` to the closest periodic
    /// image of `to`. Both points are given in fractional coordinates, and do
    /// not need to be inside the unit cell.
    pub fn shortest_vector(&self, from: Vector3D, to: Vector3D) -> Vector3D {
        let difference = wrap_fractional(to) - wrap_fractional(from);
        let centered = self.lattice.cartesian(difference.map(|d| d - f64::round(d)));

        let mut shortest = centered;
        let mut shortest_norm2 = centered.norm2();
        for translation in &self.translations[1..] {
            let candidate = centered + translation;
            let norm2 = candidate.norm2();
            if norm2 < shortest_norm2 {
                shortest = candidate;
                shortest_norm2 = norm2;
            }
        }

        return shortest;
    }

    /// Get the minimum image distance between the fractional coordinates
    /// `first` and `second`
    pub fn distance(&self, first: Vector3D, second: Vector3D) -> f64 {
        self.shortest_vector(first, second).norm()
    }
}

/// Compute the shortest vectors between all points in `first` and all
/// periodic images of the points in `second`, all given in fractional
/// coordinates.
///
/// The output has shape `(first.len(), second.len(), 3)`, and the entry
/// `[i, j, :]` is the Cartesian vector going from `first[i]` to the closest
/// image of `second[j]`.
#[time_graph::instrument(name = "pbc_shortest_vectors")]
pub fn pbc_shortest_vectors<'a, 'b>(
    lattice: &Lattice,
    first: impl Into<Points<'a>>,
    second: impl Into<Points<'b>>,
) -> Array3<f64> {
    let first = first.into();
    let second = second.into();
    let search = MinimumImage::new(lattice);

    let mut vectors = Array3::zeros((first.len(), second.len(), 3));
    vectors.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(first.as_slice().par_iter())
        .for_each(|(mut row, &from)| {
            for (j, &to) in second.as_slice().iter().enumerate() {
                let vector = search.shortest_vector(from, to);
                row[[j, 0]] = vector[0];
                row[[j, 1]] = vector[1];
                row[[j, 2]] = vector[2];
            }
        });

    return vectors;
}

/// Compute the minimum image distances between all points in `first` and
/// all points in `second`, both given in fractional coordinates.
///
/// The output has shape `(first.len(), second.len())`. Points outside of the
/// unit cell are wrapped back inside before computing distances.
#[time_graph::instrument(name = "pbc_all_distances")]
pub fn pbc_all_distances<'a, 'b>(
    lattice: &Lattice,
    first: impl Into<Points<'a>>,
    second: impl Into<Points<'b>>,
) -> Array2<f64> {
    let first = first.into();
    let second = second.into();
    let search = MinimumImage::new(lattice);

    let mut distances = Array2::zeros((first.len(), second.len()));
    distances.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(first.as_slice().par_iter())
        .for_each(|(mut row, &from)| {
            for (distance, &to) in row.iter_mut().zip(second.as_slice()) {
                *distance = search.distance(from, to);
            }
        });

    return distances;
}

/// Compute the euclidean distances between all points in `first` and all
/// points in `second`, without periodic boundary conditions.
///
/// The output has shape `(first.len(), second.len())`.
pub fn all_distances<'a, 'b>(
    first: impl Into<Points<'a>>,
    second: impl Into<Points<'b>>,
) -> Array2<f64> {
    let first = first.into();
    let second = second.into();

    let mut distances = Array2::zeros((first.len(), second.len()));
    distances.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(first.as_slice().par_iter())
        .for_each(|(mut row, &from)| {
            for (distance, &to) in row.iter_mut().zip(second.as_slice()) {
                *distance = (to - from).norm();
            }
        });

    return distances;
}

#[cfg(test)]
mod tests {
    use approx::{assert_relative_eq, assert_ulps_eq};
    use ndarray::array;

    use crate::Matrix3;
    use crate::coords::test_utils::{oblique_lattice, pseudo_random_fractional};
    use super::*;

    fn test_coordinates() -> [Vector3D; 5] {
        [
            Vector3D::new(0.3, 0.3, 0.5),
            Vector3D::new(0.1, 0.1, 0.3),
            Vector3D::new(0.9, 0.9, 0.8),
            Vector3D::new(0.1, 0.0, 0.5),
            Vector3D::new(0.9, 0.7, 0.0),
        ]
    }

    #[test]
    fn diff() {
        let diff = pbc_diff(Vector3D::new(0.1, 0.1, 0.1), Vector3D::new(0.3, 0.5, 0.9));
        assert_ulps_eq!(diff, Vector3D::new(-0.2, -0.4, 0.2), epsilon = 1e-12);

        let diff = pbc_diff(Vector3D::new(0.9, 0.1, 1.01), Vector3D::new(0.3, 0.5, 0.9));
        assert_ulps_eq!(diff, Vector3D::new(-0.4, -0.4, 0.11), epsilon = 1e-12);

        // ties always go to -0.5
        let diff = pbc_diff(Vector3D::new(0.1, 0.6, 1.01), Vector3D::new(0.6, 0.1, 0.9));
        assert_ulps_eq!(diff, Vector3D::new(-0.5, -0.5, 0.11), epsilon = 1e-12);

        let diff = pbc_diff(Vector3D::new(100.1, 0.2, 0.3), Vector3D::new(123123.4, 0.5, 502312.6));
        assert_ulps_eq!(diff, Vector3D::new(-0.3, -0.3, -0.3), epsilon = 1e-9);
    }

    #[test]
    fn diff_range() {
        for point in pseudo_random_fractional(200, 12) {
            let other = Vector3D::new(point[2], point[0], point[1]) * 7.0;
            let diff = pbc_diff(point * 3.0, other);
            for i in 0..3 {
                assert!(diff[i] >= -0.5 && diff[i] < 0.5, "{:?} is not in [-0.5, 0.5)", diff);
            }
        }
    }

    #[test]
    fn all_distances_euclidean() {
        let first = [Vector3D::new(0.0, 0.0, 0.0), Vector3D::new(0.5, 0.5, 0.5)];
        let second = [
            Vector3D::new(1.0, 2.0, -1.0),
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(1.0, 0.0, 0.0),
        ];

        let expected = array![
            [2.44948974, 1.0, 1.0],
            [2.17944947, 0.8660254, 0.8660254],
        ];
        assert_relative_eq!(all_distances(&first, &second), expected, epsilon = 1e-8);
    }

    #[test]
    fn all_distances_triclinic() {
        let lattice = Lattice::from_lengths_and_angles([8.0, 8.0, 4.0], [90.0, 76.0, 58.0]);
        let coordinates = test_coordinates();

        let expected = array![
            [0.000, 3.015, 4.072, 3.519, 3.245],
            [3.015, 0.000, 3.207, 1.131, 4.453],
            [4.072, 3.207, 0.000, 2.251, 1.788],
            [3.519, 1.131, 2.251, 0.000, 3.852],
            [3.245, 4.453, 1.788, 3.852, 0.000],
        ];

        let distances = pbc_all_distances(&lattice, &coordinates, &coordinates);
        assert_eq!(distances.shape(), [5, 5]);
        assert_relative_eq!(distances, expected, epsilon = 1.5e-3);

        // a single point is broadcast against the other set
        let distances = pbc_all_distances(&lattice, coordinates[0], &coordinates);
        assert_eq!(distances.shape(), [1, 5]);
        assert_relative_eq!(distances.row(0), expected.row(0), epsilon = 1.5e-3);

        // points outside of the unit cell are wrapped
        let distances = pbc_all_distances(&lattice, [0.0, 0.0, 17.0], [0.0, 0.0, 10.0]);
        assert_eq!(distances[[0, 0]], 0.0);
    }

    #[test]
    fn shortest_vectors() {
        let lattice = Lattice::from_lengths_and_angles([8.0, 8.0, 4.0], [90.0, 76.0, 58.0]);
        let coordinates = test_coordinates();

        let vectors = pbc_shortest_vectors(&lattice, &coordinates[..4], &coordinates);
        assert_eq!(vectors.shape(), [4, 5, 3]);

        let distances = pbc_all_distances(&lattice, &coordinates[..4], &coordinates);
        for i in 0..4 {
            for j in 0..5 {
                let vector = Vector3D::new(vectors[[i, j, 0]], vectors[[i, j, 1]], vectors[[i, j, 2]]);
                assert_ulps_eq!(vector.norm(), distances[[i, j]]);

                // the vector goes from i to an image of j
                let fractional = lattice.fractional(vector) - (coordinates[j] - coordinates[i]);
                for k in 0..3 {
                    assert_relative_eq!(fractional[k], fractional[k].round(), epsilon = 1e-10);
                }
            }
        }

        // a single point is broadcast against the other set
        let single = pbc_shortest_vectors(&lattice, coordinates[2], &coordinates);
        assert_eq!(single.shape(), [1, 5, 3]);
        for j in 0..5 {
            for k in 0..3 {
                assert_ulps_eq!(single[[0, j, k]], vectors[[2, j, k]]);
            }
        }

        let single = pbc_shortest_vectors(&lattice, &coordinates[..4], [0.9, 0.7, 0.0]);
        assert_eq!(single.shape(), [4, 1, 3]);
        for i in 0..4 {
            for k in 0..3 {
                assert_ulps_eq!(single[[i, 0, k]], vectors[[i, 4, k]]);
            }
        }
    }

    #[test]
    fn cubic_lattice_uses_nearest_images() {
        let search = MinimumImage::new(&Lattice::cubic(3.0));
        assert_eq!(search.shell(), [1, 1, 1]);

        let search = MinimumImage::new(&Lattice::from_lengths_and_angles([8.0, 8.0, 4.0], [90.0, 76.0, 58.0]));
        assert_eq!(search.shell(), [1, 1, 2]);
    }

    #[test]
    fn oblique_lattice_brute_force() {
        let lattice = oblique_lattice();
        let search = MinimumImage::new(&lattice);
        assert!(search.shell()[0] > 1);

        let points = pseudo_random_fractional(12, 42);
        for &first in &points {
            for &second in &points {
                let mut expected = f64::INFINITY;
                for n_a in -20..=20 {
                    for n_b in -20..=20 {
                        for n_c in -2..=2 {
                            let shift = Vector3D::new(n_a as f64, n_b as f64, n_c as f64);
                            let distance = lattice.cartesian(second - first + shift).norm();
                            expected = f64::min(expected, distance);
                        }
                    }
                }

                let distance = search.distance(first, second);
                assert_relative_eq!(distance, expected, epsilon = 1e-10);

                // the per-axis wrap is only an upper bound
                let approximate = lattice.cartesian(pbc_diff(second, first)).norm();
                assert!(distance <= approximate + 1e-12);
            }
        }
    }

    #[test]
    fn extremely_oblique_lattice() {
        let lattice = Lattice::new(Matrix3::new([
            [1.0, 0.0, 0.0],
            [1e4, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])).unwrap();

        let search = MinimumImage::new(&lattice);
        assert_eq!(search.shell(), [MAX_SHELL, MAX_SHELL, MAX_SHELL]);

        let first = Vector3D::new(0.1, 0.2, 0.3);
        let distance = search.distance(first, first + Vector3D::new(3.0, -2.0, 1.0));
        assert!(distance < 1e-9);

        let distance = search.distance(first, Vector3D::new(0.1, 0.2, 0.8));
        assert!(distance.is_finite());
        assert!(distance <= 0.5 + 1e-9);
    }

    #[test]
    fn left_handed_lattice() {
        let lattice = Lattice::new(Matrix3::new([
            [0.0, 3.0, 0.0],
            [3.0, 0.0, 0.0],
            [0.0, 0.0, 3.0],
        ])).unwrap();

        let distances = pbc_all_distances(&lattice, [0.1, 0.1, 0.1], [0.9, 0.9, 0.9]);
        assert_relative_eq!(distances[[0, 0]], 0.6 * f64::sqrt(3.0), epsilon = 1e-12);
    }
}
