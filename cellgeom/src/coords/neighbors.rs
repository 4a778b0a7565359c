use log::warn;
use rayon::prelude::*;

use crate::{Error, Lattice, Tolerance, Vector3D};
use super::minimum_image::wrap_fractional;
use super::{points_in_sphere_pbc, SphereNeighbor};

/// Sites closer than this distance are most likely duplicated by mistake
const CLOSE_CONTACT: f64 = 1e-3;

/// Parameters for the computation of periodic neighbor lists.
///
/// For every site, the neighbor list contains all the periodic images of all
/// sites within `cutoff` of the site (with the default tolerance).
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PeriodicNeighbors {
    /// Spherical cutoff radius, in the same units as the lattice
    pub cutoff: f64,
    /// Should the neighbor list include the site itself (at zero distance)?
    /// Periodic images of the site are always included.
    #[serde(default)]
    pub self_pairs: bool,
}

impl PeriodicNeighbors {
    /// Parse and validate neighbor list parameters from JSON
    pub fn from_json(parameters: &str) -> Result<PeriodicNeighbors, Error> {
        let parameters = serde_json::from_str::<PeriodicNeighbors>(parameters)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.cutoff > 0.0 && self.cutoff.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive cutoff for periodic neighbors, got {}", self.cutoff
            )));
        }
        return Ok(());
    }

    /// Compute the neighbor list of every site in `fractional`.
    ///
    /// The `i`-th entry of the output contains the neighbors of the `i`-th
    /// site, sorted by distance, then by index and finally by lattice
    /// translation. Sites are wrapped inside the unit cell first, and the
    /// `fractional` coordinates and `image` of the neighbors are relative to
    /// this wrapped site.
    #[time_graph::instrument(name = "PeriodicNeighbors::compute")]
    pub fn compute(&self, lattice: &Lattice, fractional: &[Vector3D]) -> Result<Vec<Vec<SphereNeighbor>>, Error> {
        self.validate()?;

        let tolerance = Tolerance::default();
        return fractional.par_iter()
            .enumerate()
            .map(|(site, &position)| -> Result<Vec<SphereNeighbor>, Error> {
                let center = lattice.cartesian(wrap_fractional(position));
                let mut neighbors = points_in_sphere_pbc(lattice, fractional, center, self.cutoff, tolerance)?;

                neighbors.retain(|neighbor| {
                    self.self_pairs || neighbor.index != site || neighbor.image != [0, 0, 0]
                });

                for neighbor in &neighbors {
                    if neighbor.index > site && neighbor.distance < CLOSE_CONTACT {
                        warn!(
                            "sites {} and {} are very close to one another ({:.3e}), \
                            they might be duplicated",
                            site, neighbor.index, neighbor.distance
                        );
                    }
                }

                neighbors.sort_by(|a, b| {
                    a.distance.total_cmp(&b.distance)
                        .then(a.index.cmp(&b.index))
                        .then(a.image.cmp(&b.image))
                });

                Ok(neighbors)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parameters() {
        let parameters = PeriodicNeighbors::from_json(r#"{"cutoff": 3.5}"#).unwrap();
        assert_eq!(parameters, PeriodicNeighbors { cutoff: 3.5, self_pairs: false });

        let parameters = PeriodicNeighbors::from_json(r#"{"cutoff": 2, "self_pairs": true}"#).unwrap();
        assert_eq!(parameters, PeriodicNeighbors { cutoff: 2.0, self_pairs: true });

        let error = PeriodicNeighbors::from_json(r#"{"cutoff": -1}"#).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: expected positive cutoff for periodic neighbors, got -1");

        let error = PeriodicNeighbors::from_json(r#"{"cutof": 3}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn single_site() {
        let lattice = Lattice::cubic(1.0);
        let sites = [Vector3D::new(0.0, 0.0, 0.0)];

        let neighbors = PeriodicNeighbors { cutoff: 1.0, self_pairs: false };
        let list = neighbors.compute(&lattice, &sites).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].len(), 6);
        for neighbor in &list[0] {
            assert_eq!(neighbor.index, 0);
            assert_relative_eq!(neighbor.distance, 1.0);
        }
        assert_eq!(list[0][0].image, [-1, 0, 0]);
        assert_eq!(list[0][5].image, [1, 0, 0]);

        let neighbors = PeriodicNeighbors { cutoff: 1.0, self_pairs: true };
        let list = neighbors.compute(&lattice, &sites).unwrap();
        assert_eq!(list[0].len(), 7);
        assert_eq!(list[0][0].image, [0, 0, 0]);
        assert_eq!(list[0][0].distance, 0.0);
    }

    #[test]
    fn body_centered() {
        let lattice = Lattice::cubic(2.0);
        let sites = [Vector3D::new(0.0, 0.0, 0.0), Vector3D::new(0.5, 0.5, 0.5)];

        let neighbors = PeriodicNeighbors { cutoff: 1.8, self_pairs: false };
        let list = neighbors.compute(&lattice, &sites).unwrap();
        assert_eq!(list.len(), 2);

        assert_eq!(list[0].len(), 8);
        for neighbor in &list[0] {
            assert_eq!(neighbor.index, 1);
            assert_relative_eq!(neighbor.distance, f64::sqrt(3.0), epsilon = 1e-12);
        }

        assert_eq!(list[1].len(), 8);
        for neighbor in &list[1] {
            assert_eq!(neighbor.index, 0);
            assert_relative_eq!(neighbor.distance, f64::sqrt(3.0), epsilon = 1e-12);
        }

        // increasing the cutoff adds the 6 images of the site itself
        let neighbors = PeriodicNeighbors { cutoff: 2.0, self_pairs: false };
        let list = neighbors.compute(&lattice, &sites).unwrap();
        assert_eq!(list[0].len(), 14);
        assert!(list[0][..8].iter().all(|n| n.index == 1));
        assert!(list[0][8..].iter().all(|n| n.index == 0));
    }

    #[test]
    fn sites_outside_of_the_cell() {
        let lattice = Lattice::cubic(2.0);
        let sites = [Vector3D::new(2.0, -1.0, 0.0), Vector3D::new(0.5, 0.5, 0.5)];

        let neighbors = PeriodicNeighbors { cutoff: 1.8, self_pairs: false };
        let list = neighbors.compute(&lattice, &sites).unwrap();
        assert_eq!(list[0].len(), 8);
        assert_eq!(list[1].len(), 8);
    }
}
