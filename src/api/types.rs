//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::projection::{ProjectionResult, ProjectionSummary};
use crate::site::SiteMetrics;

/// All reference locations with their derived metrics.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<SiteMetrics>,
}

/// Query parameters for the projection endpoint.
///
/// Omitted numeric fields fall back to the server defaults.
#[derive(Debug, Deserialize)]
pub struct ProjectionQuery {
    /// Location name (case-insensitive).
    pub location: String,
    /// Target monthly consumption (kWh).
    pub monthly_consumption_kwh: Option<f64>,
    /// Energy unit price (currency per kWh).
    pub energy_price_per_kwh: Option<f64>,
}

/// Full projection plus its headline KPIs.
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub summary: ProjectionSummary,
    pub result: ProjectionResult,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
