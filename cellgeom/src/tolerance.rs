use crate::Error;

/// Absolute distance threshold used to decide if two points are the same.
///
/// Two points are considered identical when the (possibly periodic) distance
/// between them is smaller than or equal to the tolerance. The default value
/// ([`Tolerance::DEFAULT`], 1e-8) is meant for exact comparisons, *e.g.* when
/// building index mappings between lists of coordinates; fuzzy comparisons
/// should use an explicit, larger value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Default tolerance, for exact comparisons
    pub const DEFAULT: Tolerance = Tolerance(1e-8);

    /// Create a new tolerance with the given `value`.
    ///
    /// # Panics
    ///
    /// If `value` is negative, infinite or NaN.
    pub fn new(value: f64) -> Tolerance {
        assert!(value.is_finite() && value >= 0.0, "tolerance must be a positive finite number, got {}", value);
        Tolerance(value)
    }

    /// Get the value of this tolerance
    pub fn value(self) -> f64 {
        self.0
    }

    /// Check if `distance` is within this tolerance
    #[inline]
    pub fn contains(self, distance: f64) -> bool {
        distance <= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Tolerance {
        Tolerance::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = Error;

    fn try_from(value: f64) -> Result<Tolerance, Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be a positive finite number, got {}", value
            )));
        }
        return Ok(Tolerance(value));
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> f64 {
        tolerance.0
    }
}
