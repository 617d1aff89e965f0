//! Scenario orchestration: resolve the site, run the projection, summarize.

use tracing::{debug, info, info_span};

use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::projection::{ProjectionEngine, ProjectionResult, ProjectionSummary};
use crate::site::{LocationTable, SiteModel};

/// Result and headline KPIs for one scenario.
#[derive(Debug, Clone)]
pub struct ProjectionRun {
    pub result: ProjectionResult,
    pub summary: ProjectionSummary,
}

/// Runs the projection described by `config` against `table`.
///
/// # Errors
///
/// Unknown location, malformed table entry, or invalid parameters.
pub fn run_scenario(config: &ScenarioConfig, table: &LocationTable) -> Result<ProjectionRun> {
    let span = info_span!("projection", location = %config.site.location);
    let _guard = span.enter();

    let site = SiteModel::new(table).metrics(&config.site.location)?;
    debug!(
        average_insolation = site.average_insolation,
        performance_ratio = site.performance_ratio,
        "site metrics derived"
    );

    let engine = ProjectionEngine::new(config.project.clone())?;
    let result = engine.run(&site)?;
    let summary = ProjectionSummary::from_result(&result);

    info!(
        capacity_kwp = summary.capacity_kwp,
        plant_cost = summary.plant_cost,
        payback = %summary.payback,
        "projection complete"
    );

    Ok(ProjectionRun { result, summary })
}
