//! Site-adjusted performance: average insolation and temperature-derated PR.

use serde::Serialize;

use super::location::{Location, LocationTable};
use crate::error::{Error, Result};

/// Performance ratio of a well-installed array at or below the reference temperature.
pub const BASE_PERFORMANCE_RATIO: f64 = 0.82;
/// PR loss per °C of ambient temperature above [`REFERENCE_TEMPERATURE_C`].
pub const TEMPERATURE_COEFFICIENT: f64 = 0.0045;
/// Ambient temperature below which no thermal derating is applied (°C).
pub const REFERENCE_TEMPERATURE_C: f64 = 15.0;

/// Arithmetic mean of the 12 monthly insolation values (kWh/m²/day).
///
/// # Errors
///
/// Returns [`Error::InvalidData`] unless the location has exactly 12
/// positive entries.
pub fn average_insolation(location: &Location) -> Result<f64> {
    location.validate_insolation()?;
    let total: f64 = location.monthly_insolation.iter().sum();
    Ok(total / location.monthly_insolation.len() as f64)
}

/// Temperature-derated performance ratio:
/// `0.82 - max(0, T - 15) * 0.0045`.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] for a non-finite temperature and
/// [`Error::InvalidParameter`] if the ratio resolves to `<= 0`.
pub fn adjusted_performance_ratio(location: &Location) -> Result<f64> {
    let t = location.temperature_c;
    if !t.is_finite() {
        return Err(Error::data(
            &location.name,
            format!("temperature must be finite, got {t}"),
        ));
    }
    let derating = (t - REFERENCE_TEMPERATURE_C).max(0.0) * TEMPERATURE_COEFFICIENT;
    let pr = BASE_PERFORMANCE_RATIO - derating;
    if pr <= 0.0 {
        return Err(Error::parameter(
            "site.performance_ratio",
            format!("resolves to {pr:.4} at {t} °C for {}, must be > 0", location.name),
        ));
    }
    Ok(pr)
}

/// The scalars the sizing formula needs for one location.
///
/// Derived on demand from a [`Location`]; never cached across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteMetrics {
    /// Location name.
    pub location: String,
    /// Monthly insolation copied from the reference table (kWh/m²/day).
    pub monthly_insolation: Vec<f64>,
    /// Average ambient temperature (°C).
    pub temperature_c: f64,
    /// Mean daily insolation over the year (kWh/m²/day, i.e. peak sun hours).
    pub average_insolation: f64,
    /// Temperature-adjusted performance ratio.
    pub performance_ratio: f64,
}

impl SiteMetrics {
    /// Derives metrics for a single location.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`average_insolation`] and
    /// [`adjusted_performance_ratio`].
    pub fn from_location(location: &Location) -> Result<Self> {
        Ok(Self {
            location: location.name.clone(),
            monthly_insolation: location.monthly_insolation.clone(),
            temperature_c: location.temperature_c,
            average_insolation: average_insolation(location)?,
            performance_ratio: adjusted_performance_ratio(location)?,
        })
    }

    /// Delivered energy per installed kWp per day (kWh/kWp/day).
    pub fn specific_yield(&self) -> f64 {
        self.average_insolation * self.performance_ratio
    }
}

/// Site model bound to an injected, immutable location table.
#[derive(Debug, Clone, Copy)]
pub struct SiteModel<'a> {
    table: &'a LocationTable,
}

impl<'a> SiteModel<'a> {
    pub fn new(table: &'a LocationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a LocationTable {
        self.table
    }

    /// Resolves a location by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the name is not in the table.
    pub fn location(&self, name: &str) -> Result<&'a Location> {
        self.table.get(name)
    }

    /// Mean daily insolation of the named location.
    ///
    /// # Errors
    ///
    /// See [`average_insolation`].
    pub fn average_insolation(&self, name: &str) -> Result<f64> {
        average_insolation(self.location(name)?)
    }

    /// Temperature-adjusted performance ratio of the named location.
    ///
    /// # Errors
    ///
    /// See [`adjusted_performance_ratio`].
    pub fn adjusted_performance_ratio(&self, name: &str) -> Result<f64> {
        adjusted_performance_ratio(self.location(name)?)
    }

    /// Both derived scalars for the named location.
    ///
    /// # Errors
    ///
    /// Unknown name or malformed entry.
    pub fn metrics(&self, name: &str) -> Result<SiteMetrics> {
        SiteMetrics::from_location(self.location(name)?)
    }

    /// Metrics for every location, in table order.
    ///
    /// # Errors
    ///
    /// Fails on the first location whose metrics cannot be derived.
    pub fn all_metrics(&self) -> Result<Vec<SiteMetrics>> {
        self.table.iter().map(SiteMetrics::from_location).collect()
    }
}
