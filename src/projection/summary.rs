//! Post-hoc KPIs derived from a completed projection.

use std::fmt;

use serde::Serialize;

use super::types::{Payback, ProjectionResult};

/// Headline figures for one projection run.
///
/// Computed from `ProjectionResult` after the fact so the reported totals
/// always agree with the year table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    /// Location the run was sized for.
    pub location: String,
    /// Average daily insolation (peak sun hours).
    pub average_insolation: f64,
    /// Temperature-adjusted performance ratio.
    pub performance_ratio: f64,
    /// Required capacity (kWp).
    pub capacity_kwp: f64,
    /// Estimated module count.
    pub panel_count: u32,
    /// Module rating used for the count (W).
    pub panel_rating_w: f64,
    /// Estimated plant cost.
    pub plant_cost: f64,
    /// Average daily generation, year 1 undegraded (kWh).
    pub daily_generation_kwh: f64,
    /// Average monthly saving, year 1 undegraded.
    pub monthly_saving: f64,
    /// Saving in simulated year 1 (after first-year degradation, if any).
    pub first_year_saving: f64,
    /// Energy produced over the horizon (kWh).
    pub lifetime_production_kwh: f64,
    /// Energy savings over the horizon.
    pub lifetime_savings: f64,
    /// Rebates received over the horizon.
    pub lifetime_rebates: f64,
    /// Cumulative benefit at the end of the horizon.
    pub cumulative_benefit: f64,
    /// `cumulative_benefit - plant_cost`.
    pub net_benefit: f64,
    /// Simple return on investment over the horizon (%; 0 for a free plant).
    pub roi_pct: f64,
    /// Output factor in the last simulated year.
    pub final_output_factor: f64,
    /// Payback year or beyond horizon.
    pub payback: Payback,
}

impl ProjectionSummary {
    pub fn from_result(result: &ProjectionResult) -> Self {
        let sizing = &result.sizing;

        let mut lifetime_production_kwh = 0.0;
        let mut lifetime_savings = 0.0;
        let mut lifetime_rebates = 0.0;
        for r in &result.years {
            lifetime_production_kwh += r.production_kwh;
            lifetime_savings += r.saving;
            lifetime_rebates += r.rebate;
        }

        let cumulative_benefit = result.years.last().map_or(0.0, |r| r.cumulative_benefit);
        let net_benefit = cumulative_benefit - sizing.plant_cost;
        let roi_pct = if sizing.plant_cost > 0.0 {
            100.0 * net_benefit / sizing.plant_cost
        } else {
            0.0
        };

        Self {
            location: result.site.location.clone(),
            average_insolation: result.site.average_insolation,
            performance_ratio: result.site.performance_ratio,
            capacity_kwp: sizing.capacity_kwp,
            panel_count: sizing.panel_count,
            panel_rating_w: result.parameters.panel_rating_w,
            plant_cost: sizing.plant_cost,
            daily_generation_kwh: sizing.daily_generation_kwh,
            monthly_saving: sizing.monthly_saving,
            first_year_saving: result.years.first().map_or(0.0, |r| r.saving),
            lifetime_production_kwh,
            lifetime_savings,
            lifetime_rebates,
            cumulative_benefit,
            net_benefit,
            roi_pct,
            final_output_factor: result.years.last().map_or(1.0, |r| r.output_factor),
            payback: result.payback,
        }
    }
}

impl fmt::Display for ProjectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Projection Summary: {} ---", self.location)?;
        writeln!(f, "Peak sun hours:        {:.2} h", self.average_insolation)?;
        writeln!(f, "Performance ratio:     {:.1}%", self.performance_ratio * 100.0)?;
        writeln!(f, "Required capacity:     {:.2} kWp", self.capacity_kwp)?;
        writeln!(
            f,
            "Panels:                {} x {:.0} W",
            self.panel_count, self.panel_rating_w
        )?;
        writeln!(f, "Plant cost:            {:.2}", self.plant_cost)?;
        writeln!(f, "Daily generation:      {:.2} kWh", self.daily_generation_kwh)?;
        writeln!(f, "Monthly saving:        {:.2}", self.monthly_saving)?;
        writeln!(f, "First-year saving:     {:.2}", self.first_year_saving)?;
        writeln!(
            f,
            "Lifetime production:   {:.0} kWh (final factor {:.3})",
            self.lifetime_production_kwh, self.final_output_factor
        )?;
        writeln!(f, "Lifetime savings:      {:.2}", self.lifetime_savings)?;
        writeln!(f, "Lifetime rebates:      {:.2}", self.lifetime_rebates)?;
        writeln!(f, "Net benefit:           {:.2}", self.net_benefit)?;
        writeln!(f, "ROI:                   {:.1}%", self.roi_pct)?;
        write!(f, "Payback year:          {}", self.payback)
    }
}
