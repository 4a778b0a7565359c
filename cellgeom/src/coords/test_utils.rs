use crate::{Lattice, Matrix3, Vector3D};

/// A strongly oblique lattice, where looking at the 27 closest images is not
/// enough to find the minimum image
pub fn oblique_lattice() -> Lattice {
    Lattice::new(Matrix3::new([
        [1.0, 0.0, 0.0],
        [5.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ])).expect("invalid lattice")
}

/// Generate `count` deterministic pseudo-random fractional coordinates in
/// `[0, 1)`, using a linear congruential generator seeded with `seed`
pub fn pseudo_random_fractional(count: usize, seed: u64) -> Vec<Vector3D> {
    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    return (0..count).map(|_| Vector3D::new(next(), next(), next())).collect();
}

/// All points of a regular `n x n x n` grid in fractional coordinates
pub fn fractional_grid(n: usize) -> Vec<Vector3D> {
    let mut points = Vec::with_capacity(n * n * n);
    for a in 0..n {
        for b in 0..n {
            for c in 0..n {
                points.push(Vector3D::new(
                    a as f64 / n as f64,
                    b as f64 / n as f64,
                    c as f64 / n as f64,
                ));
            }
        }
    }
    return points;
}
