use super::Vector3D;

/// Either a single point or a batch of points, used by functions that accept
/// both conventions.
///
/// A single point behaves exactly like a batch containing one point: the
/// functions taking `impl Into<Points>` always return arrays with one entry
/// per point, regardless of which variant was used.
///
/// ```
/// # use cellgeom::{Points, Vector3D};
/// let single = Points::from([0.0, 0.5, 0.5]);
/// assert_eq!(single.len(), 1);
///
/// let batch = vec![Vector3D::zero(), Vector3D::new(0.5, 0.5, 0.5)];
/// let batch = Points::from(&batch);
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.as_slice()[1], Vector3D::new(0.5, 0.5, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Points<'a> {
    /// A single point
    Single(Vector3D),
    /// A batch of points, borrowed from the caller
    Batch(&'a [Vector3D]),
}

impl<'a> Points<'a> {
    /// Get the number of points
    pub fn len(&self) -> usize {
        match self {
            Points::Single(_) => 1,
            Points::Batch(points) => points.len(),
        }
    }

    /// Check if there are no points at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all the points as a slice
    pub fn as_slice(&self) -> &[Vector3D] {
        match self {
            Points::Single(point) => std::slice::from_ref(point),
            Points::Batch(points) => points,
        }
    }
}

impl<'a> From<Vector3D> for Points<'a> {
    fn from(point: Vector3D) -> Points<'a> {
        Points::Single(point)
    }
}

impl<'a> From<[f64; 3]> for Points<'a> {
    fn from(point: [f64; 3]) -> Points<'a> {
        Points::Single(Vector3D::from(point))
    }
}

impl<'a> From<&'a [Vector3D]> for Points<'a> {
    fn from(points: &'a [Vector3D]) -> Points<'a> {
        Points::Batch(points)
    }
}

impl<'a> From<&'a Vec<Vector3D>> for Points<'a> {
    fn from(points: &'a Vec<Vector3D>) -> Points<'a> {
        Points::Batch(points)
    }
}

impl<'a, const N: usize> From<&'a [Vector3D; N]> for Points<'a> {
    fn from(points: &'a [Vector3D; N]) -> Points<'a> {
        Points::Batch(points)
    }
}
