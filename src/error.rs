//! Error taxonomy shared by the site model and the projection engine.

use std::fmt;

/// Errors raised while deriving site metrics or running a projection.
///
/// Every error is produced before any part of a `ProjectionResult` is
/// built, so callers never observe partial output.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed reference data: wrong monthly value count, non-positive
    /// insolation, duplicate or missing location.
    InvalidData {
        /// Location name or table path the problem was found at.
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
    /// Non-physical user input: non-positive consumption, negative price,
    /// rebate horizon beyond the simulation horizon, performance ratio <= 0.
    InvalidParameter {
        /// Dotted parameter path (e.g., `"project.energy_price_per_kwh"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
}

impl Error {
    pub(crate) fn data(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field path the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidData { field, .. } | Self::InvalidParameter { field, .. } => field,
        }
    }

    /// Constraint description without the field prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidData { message, .. } | Self::InvalidParameter { message, .. } => message,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidData { field, message } => {
                write!(f, "invalid data: {field}: {message}")
            }
            Self::InvalidParameter { field, message } => {
                write!(f, "invalid parameter: {field}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_field() {
        let e = Error::parameter("project.energy_price_per_kwh", "must be >= 0");
        assert_eq!(
            e.to_string(),
            "invalid parameter: project.energy_price_per_kwh: must be >= 0"
        );

        let e = Error::data("Atlantis", "unknown location");
        assert!(e.to_string().starts_with("invalid data: Atlantis"));
    }

    #[test]
    fn accessors_expose_parts() {
        let e = Error::data("Quito", "expected 12 monthly values, got 11");
        assert_eq!(e.field(), "Quito");
        assert_eq!(e.message(), "expected 12 monthly values, got 11");
    }
}
