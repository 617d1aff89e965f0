//! Array sizing and the multi-year cash-flow projection.

pub mod engine;
pub mod summary;
pub mod types;

pub use engine::{ProjectionEngine, panel_count, project};
pub use summary::ProjectionSummary;
pub use types::{
    DaysConvention, DegradationModel, HORIZON_YEARS, MonthRecord, Payback, ProjectParameters,
    ProjectionResult, RebateScheme, Sizing, YearRecord,
};
