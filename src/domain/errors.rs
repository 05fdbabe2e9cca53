//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided ID is empty.
    EmptyId,

    /// The provided floor is not an integer.
    InvalidFloor(String),

    /// A page size of zero was requested.
    InvalidPageSize,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "ID cannot be empty"),
            Self::InvalidFloor(floor) => write!(f, "Invalid floor: {}", floor),
            Self::InvalidPageSize => write!(f, "Items per page must be greater than zero"),
        }
    }
}

impl std::error::Error for ValidationError {}
