//! The `Lattice` type represents the periodic repetition of space defined by
//! three lattice vectors, and is used to convert between fractional and
//! Cartesian coordinates.
use crate::{Error, Matrix3, Vector3D};

/// Smallest ratio between the volume of the cell and the product of the
/// lattice vector lengths for which a lattice is considered to be invertible.
/// This ratio is 1 for orthogonal lattices and 0 for flat ones.
const MIN_RELATIVE_VOLUME: f64 = 1e-12;

/// A `Lattice` defines a periodic repetition of space, using three lattice
/// vectors stored as the rows of a 3x3 matrix.
///
/// A fractional coordinate `f` corresponds to the Cartesian coordinate
/// `f[0] * a + f[1] * b + f[2] * c`, where `a`, `b` and `c` are the lattice
/// vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Matrix3", into = "Matrix3")]
pub struct Lattice {
    /// Lattice matrix, with the lattice vectors as rows
    matrix: Matrix3,
    /// Transpose of the lattice matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the lattice matrix, cached from matrix.
    /// The rows of this matrix are the reciprocal lattice vectors.
    inverse: Matrix3,
}

impl TryFrom<Matrix3> for Lattice {
    type Error = Error;

    fn try_from(matrix: Matrix3) -> Result<Lattice, Error> {
        Lattice::new(matrix)
    }
}

impl From<Lattice> for Matrix3 {
    fn from(lattice: Lattice) -> Matrix3 {
        lattice.matrix
    }
}

impl schemars::JsonSchema for Lattice {
    fn schema_name() -> String {
        "Lattice".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let mut schema = <[[f64; 3]; 3] as schemars::JsonSchema>::json_schema(gen).into_object();
        schema.metadata().description = Some(
            "lattice vectors, one per row, which must be linearly independent".into()
        );
        return schemars::schema::Schema::Object(schema);
    }
}

impl Lattice {
    /// Create a new lattice using the rows of `matrix` as lattice vectors.
    ///
    /// This fails if the three vectors are (close to) linearly dependent, or
    /// contain non-finite values.
    pub fn new(matrix: Matrix3) -> Result<Lattice, Error> {
        let all_finite = (0..3).all(|i| matrix.row(i).is_finite());
        if !all_finite {
            return Err(Error::InvalidParameter(
                "lattice matrix contains non-finite values".into()
            ));
        }

        let determinant = matrix.determinant();
        let lengths = matrix.row(0).norm() * matrix.row(1).norm() * matrix.row(2).norm();
        if f64::abs(determinant) <= MIN_RELATIVE_VOLUME * lengths {
            return Err(Error::InvalidParameter(format!(
                "lattice vectors are linearly dependent (determinant is {})", determinant
            )));
        }

        return Ok(Lattice {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
        });
    }

    /// Create an orthorhombic lattice, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Lattice {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Lattice lengths must be positive");
        let matrix = Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]);
        Lattice {
            matrix: matrix,
            transpose: matrix,
            inverse: matrix.inverse(),
        }
    }

    /// Create a cubic lattice, with side lengths `length, length, length`.
    pub fn cubic(length: f64) -> Lattice {
        Lattice::orthorhombic(length, length, length)
    }

    /// Create a lattice from the lengths `[a, b, c]` of the lattice vectors
    /// and the angles `[alpha, beta, gamma]` between them, in degrees.
    ///
    /// The first vector is aligned with the x axis, and the second one is in
    /// the xy plane.
    pub fn from_lengths_and_angles(lengths: [f64; 3], angles: [f64; 3]) -> Lattice {
        let [a, b, c] = lengths;
        let [alpha, beta, gamma] = angles;
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Lattice lengths must be positive");

        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z2 = c * c - c_y * c_y - c_x * c_x;
        assert!(c_z2 > 0.0, "these lattice angles do not describe a valid lattice");

        let matrix = Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, f64::sqrt(c_z2)],
        ]);

        return Lattice {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
        };
    }

    /// Get the matrix representation of the lattice, with the lattice vectors
    /// as rows
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the lengths of the three lattice vectors
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.matrix.row(0).norm(),
            self.matrix.row(1).norm(),
            self.matrix.row(2).norm(),
        ]
    }

    /// Get the angles `[alpha, beta, gamma]` between the lattice vectors, in
    /// degrees
    pub fn angles(&self) -> [f64; 3] {
        let (a, b, c) = (self.matrix.row(0), self.matrix.row(1), self.matrix.row(2));
        [vector_angle(b, c), vector_angle(a, c), vector_angle(a, b)]
    }

    /// Get the volume of the lattice unit cell
    pub fn volume(&self) -> f64 {
        let (a, b, c) = (self.matrix.row(0), self.matrix.row(1), self.matrix.row(2));
        f64::abs(a * (b ^ c))
    }

    /// Get the reciprocal lattice matrix, with the reciprocal lattice vectors
    /// as rows. This uses the crystallographic convention, without a factor
    /// 2π: the i-th lattice vector and j-th reciprocal vector have a scalar
    /// product of 1 if `i == j` and 0 otherwise.
    pub fn reciprocal_matrix(&self) -> Matrix3 {
        self.inverse
    }

    /// Get the lengths of the three reciprocal lattice vectors (without a
    /// factor 2π). The inverse of these lengths are the distances between
    /// opposite faces of the unit cell.
    pub fn reciprocal_lengths(&self) -> [f64; 3] {
        [
            self.inverse.row(0).norm(),
            self.inverse.row(1).norm(),
            self.inverse.row(2).norm(),
        ]
    }

    /// Get the fractional representation of the Cartesian `vector`
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        // this needs to use the inverse of the transpose of the matrix, since
        // we only have code to multiply a vector by a matrix on the left
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.transpose * fractional;
    }
}

/// Get the angle between the vectors `u` and `v`, in degrees.
pub fn vector_angle(u: Vector3D, v: Vector3D) -> f64 {
    let cos = u.normalized() * v.normalized();
    // rounding errors can bring the cosine slightly outside of [-1, 1]
    f64::acos(f64::clamp(cos, -1.0, 1.0)).to_degrees()
}
