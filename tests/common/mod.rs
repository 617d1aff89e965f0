//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_payback::projection::{DegradationModel, ProjectParameters, ProjectionResult, project};
use solar_payback::site::{LocationTable, SiteMetrics, SiteModel};

/// Built-in nine-city reference table.
pub fn builtin_table() -> LocationTable {
    LocationTable::builtin().expect("builtin table should load")
}

/// Derived metrics for a built-in location.
pub fn site(name: &str) -> SiteMetrics {
    SiteModel::new(&builtin_table())
        .metrics(name)
        .unwrap_or_else(|e| panic!("metrics for {name}: {e}"))
}

/// Default parameters: 300 kWh/month at 0.092 per kWh, first-year degradation.
pub fn default_params() -> ProjectParameters {
    ProjectParameters::default()
}

/// Default parameters with a flat 0.5 %/yr degradation and no first-year loss.
pub fn uniform_params() -> ProjectParameters {
    ProjectParameters {
        degradation: DegradationModel::Uniform { annual: 0.005 },
        ..ProjectParameters::default()
    }
}

/// Runs a projection for a built-in location, panicking on rejection.
pub fn run(name: &str, params: &ProjectParameters) -> ProjectionResult {
    project(&site(name), params).unwrap_or_else(|e| panic!("projection for {name}: {e}"))
}

/// Asserts two floats agree within `tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual} (tol {tol})"
    );
}
