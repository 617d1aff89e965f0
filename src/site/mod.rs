//! Per-location reference data and the derived site metrics.

pub mod location;
pub mod metrics;

pub use location::{Location, LocationTable, MONTH_NAMES, MONTHS_PER_YEAR};
pub use metrics::{SiteMetrics, SiteModel, adjusted_performance_ratio, average_insolation};
