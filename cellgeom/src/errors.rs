#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// A value was requested outside of the range covered by the input data
    Domain(String),
    /// Two sets of coordinates could not be matched one-to-one
    Correspondence(String),
    /// A supercell transformation matrix can not be used to build a supercell
    InvalidTransform(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::Domain(e) => write!(f, "out of domain: {}", e),
            Error::Correspondence(e) => write!(f, "no correspondence between coordinates: {}", e),
            Error::InvalidTransform(e) => write!(f, "invalid supercell transformation: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::Domain(_) |
            Error::Correspondence(_) |
            Error::InvalidTransform(_) => None,
            Error::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}
