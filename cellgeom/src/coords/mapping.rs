use ndarray::Array2;
use log::debug;

use crate::{Error, Lattice, Tolerance, Vector3D};
use super::{all_distances, pbc_all_distances};

/// Get the indexes `mapping` such that `second[mapping[i]]` is the same point
/// as `first[i]` (within `tolerance`), for all `i`.
///
/// `second` must be a permutation of `first`: both lists must have the same
/// size, and the mapping must be one-to-one. An error is returned if this is
/// not the case.
pub fn coord_list_mapping(first: &[Vector3D], second: &[Vector3D], tolerance: Tolerance) -> Result<Vec<usize>, Error> {
    check_sizes(first, second)?;
    let distances = all_distances(first, second);
    return mapping_from_distances(&distances, tolerance);
}

/// Get the indexes `mapping` such that `second[mapping[i]]` is a periodic
/// image of `first[i]` (within `tolerance`), for all `i`. Both lists contain
/// fractional coordinates in the given `lattice`.
///
/// `second` must be a permutation of `first` (up to lattice translations):
/// both lists must have the same size, and the mapping must be one-to-one.
/// An error is returned if this is not the case.
pub fn coord_list_mapping_pbc(
    lattice: &Lattice,
    first: &[Vector3D],
    second: &[Vector3D],
    tolerance: Tolerance,
) -> Result<Vec<usize>, Error> {
    check_sizes(first, second)?;
    let distances = pbc_all_distances(lattice, first, second);
    return mapping_from_distances(&distances, tolerance);
}

fn check_sizes(first: &[Vector3D], second: &[Vector3D]) -> Result<(), Error> {
    if first.len() != second.len() {
        return Err(Error::Correspondence(format!(
            "can not map {} coordinates onto {} coordinates", first.len(), second.len()
        )));
    }
    Ok(())
}

/// Pick the closest column for each row of `distances`, and check that the
/// result is a one-to-one mapping with all distances within tolerance.
///
/// Columns already used by a previous row are skipped, so duplicated points
/// present in both lists are still mapped one-to-one.
fn mapping_from_distances(distances: &Array2<f64>, tolerance: Tolerance) -> Result<Vec<usize>, Error> {
    let mut mapping = Vec::with_capacity(distances.nrows());
    let mut used_by = vec![None; distances.ncols()];

    for (i, row) in distances.rows().into_iter().enumerate() {
        let mut closest: Option<(usize, f64)> = None;
        let mut closest_unused: Option<(usize, f64)> = None;
        for (j, &distance) in row.iter().enumerate() {
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((j, distance));
            }

            if used_by[j].is_none() && closest_unused.map_or(true, |(_, best)| distance < best) {
                closest_unused = Some((j, distance));
            }
        }

        match closest_unused {
            Some((j, distance)) if tolerance.contains(distance) => {
                used_by[j] = Some(i);
                mapping.push(j);
            }
            _ => {
                if let Some((j, distance)) = closest {
                    if let (true, Some(previous)) = (tolerance.contains(distance), used_by[j]) {
                        return Err(Error::Correspondence(format!(
                            "coordinates {} and {} both map to coordinate {}, \
                            the second list likely contains duplicates",
                            previous, i, j
                        )));
                    }

                    return Err(Error::Correspondence(format!(
                        "no coordinate matches coordinate {} within the tolerance \
                        (closest is {} at a distance of {})",
                        i, j, distance
                    )));
                }

                return Err(Error::Correspondence(format!(
                    "no coordinate matches coordinate {}", i
                )));
            }
        }
    }

    debug!("mapped {} coordinates", mapping.len());
    return Ok(mapping);
}
