//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, LocationsResponse, ProjectionQuery, ProjectionResponse};
use crate::error::Error;
use crate::projection::{ProjectParameters, ProjectionEngine, ProjectionSummary};
use crate::site::SiteModel;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(e: &Error) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Returns every reference location with its derived metrics.
///
/// `GET /locations` → 200 + `LocationsResponse` JSON
pub async fn get_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let locations = SiteModel::new(&state.table)
        .all_metrics()
        .map_err(|e| bad_request(&e))?;
    Ok(Json(LocationsResponse { locations }))
}

/// Runs a projection for one location.
///
/// `GET /projection?location=Quito` → 200 + `ProjectionResponse` JSON
/// `GET /projection?location=Quito&monthly_consumption_kwh=0` → 400 + `ErrorResponse`
pub async fn get_projection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<ProjectionResponse>, ApiError> {
    let defaults = &state.defaults;
    let params = ProjectParameters {
        monthly_consumption_kwh: query
            .monthly_consumption_kwh
            .unwrap_or(defaults.monthly_consumption_kwh),
        energy_price_per_kwh: query
            .energy_price_per_kwh
            .unwrap_or(defaults.energy_price_per_kwh),
        ..defaults.clone()
    };

    let site = SiteModel::new(&state.table)
        .metrics(&query.location)
        .map_err(|e| bad_request(&e))?;
    let result = ProjectionEngine::new(params)
        .and_then(|engine| engine.run(&site))
        .map_err(|e| {
            tracing::debug!(location = %query.location, error = %e, "projection rejected");
            bad_request(&e)
        })?;

    Ok(Json(ProjectionResponse {
        summary: ProjectionSummary::from_result(&result),
        result,
    }))
}
