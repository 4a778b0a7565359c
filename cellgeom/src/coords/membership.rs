//! Tolerance-based tests for the presence of coordinates in a list.
//!
//! The plain versions use the euclidean distance between the coordinates as
//! given, while the `_pbc` versions take fractional coordinates and use the
//! minimum image distance in the corresponding lattice.

use crate::{Lattice, Tolerance, Vector3D};
use super::MinimumImage;

/// Check if `coord` is within `tolerance` of any point in `coords`
pub fn in_coord_list(coords: &[Vector3D], coord: Vector3D, tolerance: Tolerance) -> bool {
    coords.iter().any(|&other| tolerance.contains((other - coord).norm()))
}

/// Get the indexes of all points in `coords` within `tolerance` of `coord`,
/// in increasing order. The list is empty if there are no such points.
pub fn find_in_coord_list(coords: &[Vector3D], coord: Vector3D, tolerance: Tolerance) -> Vec<usize> {
    coords.iter()
        .enumerate()
        .filter(|(_, &other)| tolerance.contains((other - coord).norm()))
        .map(|(i, _)| i)
        .collect()
}

/// Check if all points in `subset` are within `tolerance` of at least one
/// point in `superset`.
pub fn is_coord_subset(subset: &[Vector3D], superset: &[Vector3D], tolerance: Tolerance) -> bool {
    subset.iter().all(|&coord| in_coord_list(superset, coord, tolerance))
}

/// Check if the fractional coordinate `coord` is within `tolerance` of any
/// periodic image of a point in `coords`.
pub fn in_coord_list_pbc(lattice: &Lattice, coords: &[Vector3D], coord: Vector3D, tolerance: Tolerance) -> bool {
    let search = MinimumImage::new(lattice);
    coords.iter().any(|&other| tolerance.contains(search.distance(coord, other)))
}

/// Get the indexes of all points in `coords` with a periodic image within
/// `tolerance` of `coord`, in increasing order. All coordinates are
/// fractional.
pub fn find_in_coord_list_pbc(lattice: &Lattice, coords: &[Vector3D], coord: Vector3D, tolerance: Tolerance) -> Vec<usize> {
    let search = MinimumImage::new(lattice);
    coords.iter()
        .enumerate()
        .filter(|(_, &other)| tolerance.contains(search.distance(coord, other)))
        .map(|(i, _)| i)
        .collect()
}

/// Check if all points in `subset` are within `tolerance` of a periodic image
/// of at least one point in `superset`. All coordinates are fractional.
pub fn is_coord_subset_pbc(lattice: &Lattice, subset: &[Vector3D], superset: &[Vector3D], tolerance: Tolerance) -> bool {
    let search = MinimumImage::new(lattice);
    subset.iter().all(|&coord| {
        superset.iter().any(|&other| tolerance.contains(search.distance(coord, other)))
    })
}
