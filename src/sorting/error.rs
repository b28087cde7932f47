use std::fmt;

/// Errors reported by sprite registration and configuration.
///
/// The per-frame ordering pass never fails; everything that could go wrong
/// with a sprite is rejected here, when it enters the sorter.
#[derive(Debug, Clone, PartialEq)]
pub enum SortError {
    /// A footprint must have at least one point.
    EmptyFootprint,
    /// A line footprint needs two or more points.
    LineTooShort { points: usize },
    /// A footprint point or the bounds contain NaN or infinity.
    NonFiniteCoordinate,
    /// The key is already registered with the sorter.
    AlreadyRegistered,
    /// The key is not registered with the sorter.
    UnknownSprite,
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::EmptyFootprint => write!(f, "sprite footprint has no points"),
            SortError::LineTooShort { points } => {
                write!(f, "line footprint needs at least 2 points, got {}", points)
            }
            SortError::NonFiniteCoordinate => write!(f, "sprite geometry contains a non-finite coordinate"),
            SortError::AlreadyRegistered => write!(f, "sprite is already registered"),
            SortError::UnknownSprite => write!(f, "sprite is not registered"),
            SortError::InvalidConfig(msg) => write!(f, "invalid sort configuration: {}", msg),
        }
    }
}

impl std::error::Error for SortError {}
