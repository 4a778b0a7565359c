use log::{debug, warn};

use crate::{Error, Lattice, Tolerance, Vector3D};
use super::minimum_image::wrap_fractional;

/// Extra margin (in fractional units) added to the translation range, to make
/// sure rounding errors never exclude an image at the edge of the sphere
const RANGE_MARGIN: f64 = 1e-6;

/// Number of periodic images after which we warn about slow searches
const MANY_IMAGES: usize = 1_000_000;

/// A periodic image of a point found inside a sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereNeighbor {
    /// index of the original point in the list of candidates
    pub index: usize,
    /// fractional coordinates of this periodic image. This is the original
    /// point wrapped inside the unit cell, translated by `image`.
    pub fractional: Vector3D,
    /// lattice translation applied to the wrapped point to create this
    /// periodic image
    pub image: [i32; 3],
    /// distance between this periodic image and the center of the sphere
    pub distance: f64,
}

/// Find all the periodic images of the `fractional` points within a distance
/// `radius` (+ `tolerance`) of the Cartesian position `center`.
///
/// The same point can appear multiple times in the output (with different
/// `image`) if the sphere is larger than the unit cell. Points are wrapped
/// inside the unit cell before looking for periodic images. The output is
/// sorted by lattice translation, and then by point index.
#[time_graph::instrument(name = "points_in_sphere_pbc")]
pub fn points_in_sphere_pbc(
    lattice: &Lattice,
    fractional: &[Vector3D],
    center: Vector3D,
    radius: f64,
    tolerance: Tolerance,
) -> Result<Vec<SphereNeighbor>, Error> {
    if !(radius >= 0.0 && radius.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "sphere radius must be a positive finite number, got {}", radius
        )));
    }

    if !center.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "sphere center must be finite, got {:?}", center
        )));
    }

    let cutoff = radius + tolerance.value();
    let ranges = translation_ranges(lattice, center, cutoff)?;

    let n_images = ranges.iter()
        .try_fold(1_usize, |count, range| {
            let length = usize::try_from(i64::from(range.1) - i64::from(range.0) + 1).ok()?;
            count.checked_mul(length)
        })
        .ok_or_else(|| Error::InvalidParameter(format!(
            "sphere radius {} is too large for this lattice, the number of \
            periodic images to check does not fit in memory", radius
        )))?;
    debug!("looking for points in sphere in {} periodic images ({:?})", n_images, ranges);
    if n_images.saturating_mul(fractional.len()) > MANY_IMAGES {
        warn!(
            "searching points in a sphere of radius {} will check {} periodic images, this might be slow",
            radius, n_images.saturating_mul(fractional.len())
        );
    }

    let wrapped = fractional.iter().map(|&f| wrap_fractional(f)).collect::<Vec<_>>();

    let mut neighbors = Vec::new();
    for n_a in ranges[0].0..=ranges[0].1 {
        for n_b in ranges[1].0..=ranges[1].1 {
            for n_c in ranges[2].0..=ranges[2].1 {
                let translation = Vector3D::new(n_a as f64, n_b as f64, n_c as f64);
                for (index, &point) in wrapped.iter().enumerate() {
                    let image = point + translation;
                    let distance = (lattice.cartesian(image) - center).norm();
                    if distance <= cutoff {
                        neighbors.push(SphereNeighbor {
                            index: index,
                            fractional: image,
                            image: [n_a, n_b, n_c],
                            distance: distance,
                        });
                    }
                }
            }
        }
    }

    return Ok(neighbors);
}

/// Get the smallest range of lattice translations along each lattice vector
/// such that all points in the unit cell translated by values in this range
/// cover a sphere of radius `cutoff` around `center`.
///
/// A sphere of radius `r` spans `r |b_i|` in fractional units along the
/// i-th direction, where `b_i` is the i-th reciprocal lattice vector. This
/// fails if the range does not fit in `i32`.
fn translation_ranges(lattice: &Lattice, center: Vector3D, cutoff: f64) -> Result<[(i32, i32); 3], Error> {
    let center = lattice.fractional(center);
    let reciprocal = lattice.reciprocal_lengths();

    let mut ranges = [(0, 0); 3];
    for i in 0..3 {
        let extent = cutoff * reciprocal[i] + RANGE_MARGIN;
        let start = f64::floor(center[i] - extent);
        let stop = f64::floor(center[i] + extent);

        let in_range = |value: f64| value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
        if !(in_range(start) && in_range(stop)) {
            return Err(Error::InvalidParameter(format!(
                "sphere radius {} is too large for this lattice, it would need \
                lattice translations from {} to {} along lattice vector {}",
                cutoff, start, stop, i
            )));
        }

        ranges[i] = (start as i32, stop as i32);
    }
    return Ok(ranges);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::coords::test_utils::{fractional_grid, oblique_lattice, pseudo_random_fractional};
    use super::*;

    #[test]
    fn cubic_grid() {
        let lattice = Lattice::cubic(1.0);
        let points = fractional_grid(10);

        let neighbors = points_in_sphere_pbc(&lattice, &points, Vector3D::zero(), 0.1, Tolerance::default()).unwrap();
        assert_eq!(neighbors.len(), 7);
        for neighbor in &neighbors {
            assert!(neighbor.distance <= 0.1 + 1e-8);
        }
        assert_eq!(neighbors.iter().filter(|n| n.distance == 0.0).count(), 1);

        let center = Vector3D::new(0.5, 0.5, 0.5);
        let neighbors = points_in_sphere_pbc(&lattice, &points, center, 0.5, Tolerance::default()).unwrap();
        assert_eq!(neighbors.len(), 515);
    }

    #[test]
    fn images_of_the_same_point() {
        let lattice = Lattice::cubic(2.0);
        let points = [Vector3D::new(0.25, 0.5, 0.5)];

        // the sphere is larger than the unit cell
        let center = lattice.cartesian(Vector3D::new(0.25, 0.5, 0.5));
        let neighbors = points_in_sphere_pbc(&lattice, &points, center, 2.0, Tolerance::default()).unwrap();
        assert_eq!(neighbors.len(), 7);
        for neighbor in &neighbors {
            assert_eq!(neighbor.index, 0);
            let shift = neighbor.image;
            let expected = Vector3D::new(0.25 + shift[0] as f64, 0.5 + shift[1] as f64, 0.5 + shift[2] as f64);
            assert_eq!(neighbor.fractional, expected);
        }
    }

    #[test]
    fn points_outside_of_the_cell() {
        let lattice = Lattice::cubic(2.0);
        let points = [Vector3D::new(3.05, -0.95, 0.0)];

        let neighbors = points_in_sphere_pbc(&lattice, &points, Vector3D::zero(), 0.2, Tolerance::default()).unwrap();
        // the point is wrapped inside the cell before translation
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].image, [0, 0, 0]);
        assert_relative_eq!(neighbors[0].distance, 0.1 * f64::sqrt(2.0), epsilon = 1e-12);
    }

    #[test]
    fn oblique_brute_force() {
        let lattice = oblique_lattice();
        let points = pseudo_random_fractional(20, 7);
        let center = lattice.cartesian(Vector3D::new(0.3, 0.6, 0.2));
        let radius = 1.7;

        let neighbors = points_in_sphere_pbc(&lattice, &points, center, radius, Tolerance::default()).unwrap();

        let mut expected = 0;
        for n_a in -30..=30 {
            for n_b in -10..=10 {
                for n_c in -5..=5 {
                    let shift = Vector3D::new(n_a as f64, n_b as f64, n_c as f64);
                    for &point in &points {
                        let distance = (lattice.cartesian(point + shift) - center).norm();
                        if distance <= radius {
                            expected += 1;
                        }
                    }
                }
            }
        }

        assert!(expected > 0);
        assert_eq!(neighbors.len(), expected);
    }

    #[test]
    fn invalid_radius() {
        let lattice = Lattice::cubic(1.0);
        let error = points_in_sphere_pbc(&lattice, &[], Vector3D::zero(), -1.0, Tolerance::default()).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: sphere radius must be a positive finite number, got -1");

        let error = points_in_sphere_pbc(&lattice, &[], Vector3D::zero(), f64::NAN, Tolerance::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));
    }

    #[test]
    fn huge_radius() {
        let lattice = Lattice::cubic(1.0);

        // translations do not fit in i32
        let error = points_in_sphere_pbc(&lattice, &[], Vector3D::zero(), 1e10, Tolerance::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));
        assert!(error.to_string().contains("is too large for this lattice"));

        let points = [Vector3D::new(0.5, 0.5, 0.5)];
        let error = points_in_sphere_pbc(&lattice, &points, Vector3D::zero(), 1e10, Tolerance::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));

        // translations fit in i32, but the number of images overflows
        let error = points_in_sphere_pbc(&lattice, &points, Vector3D::zero(), 1e9, Tolerance::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));
        assert!(error.to_string().contains("does not fit in memory"));
    }
}
