//! Location reference table: monthly insolation and ambient temperature per site.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of monthly insolation values every location carries.
pub const MONTHS_PER_YEAR: usize = 12;

/// Short month labels in table order.
pub const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Built-in reference table, embedded at compile time.
const BUILTIN_TABLE: &str = include_str!("../../data/locations.toml");

/// A site with its monthly peak-sun-hours and average ambient temperature.
///
/// Immutable reference data. Shape is checked by [`Location::validate`],
/// which [`LocationTable`] runs on every entry at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    /// Display name, also the lookup key (case-insensitive).
    pub name: String,
    /// Average daily insolation per calendar month, January first (kWh/m²/day).
    pub monthly_insolation: Vec<f64>,
    /// Average ambient temperature (°C).
    pub temperature_c: f64,
}

impl Location {
    /// Creates a location without validating it.
    pub fn new(name: impl Into<String>, monthly_insolation: Vec<f64>, temperature_c: f64) -> Self {
        Self {
            name: name.into(),
            monthly_insolation,
            temperature_c,
        }
    }

    /// Checks that the monthly sequence has exactly 12 positive, finite entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] naming the location and the first
    /// offending month.
    pub fn validate_insolation(&self) -> Result<()> {
        if self.monthly_insolation.len() != MONTHS_PER_YEAR {
            return Err(Error::data(
                &self.name,
                format!(
                    "expected {MONTHS_PER_YEAR} monthly insolation values, got {}",
                    self.monthly_insolation.len()
                ),
            ));
        }
        for (month, &value) in MONTH_NAMES.iter().zip(&self.monthly_insolation) {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::data(
                    &self.name,
                    format!("insolation for {month} must be a positive number, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Full shape check: non-empty name, monthly sequence, finite temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] on the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::data("location.name", "must not be empty"));
        }
        self.validate_insolation()?;
        if !self.temperature_c.is_finite() {
            return Err(Error::data(
                &self.name,
                format!("temperature must be finite, got {}", self.temperature_c),
            ));
        }
        Ok(())
    }

    fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// On-disk shape of a table file: a list of `[[location]]` entries.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default, rename = "location")]
    locations: Vec<Location>,
}

/// Ordered, validated set of locations.
///
/// Loaded once at start-up and shared by reference; never mutated.
///
/// # Examples
///
/// ```
/// use solar_payback::site::LocationTable;
///
/// let table = LocationTable::builtin().unwrap();
/// assert_eq!(table.len(), 9);
/// assert!(table.get("quito").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTable {
    locations: Vec<Location>,
}

impl LocationTable {
    /// Builds a table, validating every entry and rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the list is empty, any entry is
    /// malformed, or two entries share a name.
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        if locations.is_empty() {
            return Err(Error::data("locations", "table must contain at least one location"));
        }
        for (i, loc) in locations.iter().enumerate() {
            loc.validate()?;
            if locations[..i].iter().any(|prev| prev.matches(&loc.name)) {
                return Err(Error::data(&loc.name, "duplicate location name"));
            }
        }
        Ok(Self { locations })
    }

    /// The nine-city reference table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded table is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Parses a table from TOML text (`[[location]]` entries).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] on TOML syntax errors, unknown keys,
    /// or any shape violation.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: TableFile =
            toml::from_str(s).map_err(|e| Error::data("locations", e.to_string()))?;
        Self::new(file.locations)
    }

    /// Reads and parses a table file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::data(
                "locations",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Looks up a location by name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] listing the known names if none match.
    pub fn get(&self, name: &str) -> Result<&Location> {
        self.locations
            .iter()
            .find(|loc| loc.matches(name))
            .ok_or_else(|| {
                Error::data(
                    name,
                    format!(
                        "unknown location, available: {}",
                        self.names().collect::<Vec<_>>().join(", ")
                    ),
                )
            })
    }

    /// Location names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|loc| loc.name.as_str())
    }

    /// Iterates over locations in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocationTable {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
