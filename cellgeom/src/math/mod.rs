//! Small numerical utilities that do not depend on the lattice

mod linalg;

mod barycentric;
pub use self::barycentric::{barycentric_coords, barycentric_coords_single};

mod interpolate;
pub use self::interpolate::linear_interpolated_value;
