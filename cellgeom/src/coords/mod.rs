//! Operations on sets of coordinates, with or without periodic boundary
//! conditions.
//!
//! Unless stated otherwise, the `_pbc` functions take fractional coordinates
//! together with the corresponding [`Lattice`](crate::Lattice), and measure
//! distances in Cartesian space.

mod minimum_image;
pub use self::minimum_image::{MinimumImage, pbc_diff, pbc_shortest_vectors, pbc_all_distances, all_distances};

mod membership;
pub use self::membership::{in_coord_list, find_in_coord_list, is_coord_subset};
pub use self::membership::{in_coord_list_pbc, find_in_coord_list_pbc, is_coord_subset_pbc};

mod mapping;
pub use self::mapping::{coord_list_mapping, coord_list_mapping_pbc};

mod sphere;
pub use self::sphere::{points_in_sphere_pbc, SphereNeighbor};

mod supercell;
pub use self::supercell::lattice_points_in_supercell;

mod neighbors;
pub use self::neighbors::PeriodicNeighbors;

#[cfg(test)]
pub(crate) mod test_utils;
