//! Projection engine: array sizing plus the 25-year degradation and cash-flow loop.

use crate::error::{Error, Result};
use crate::site::{MONTH_NAMES, MONTHS_PER_YEAR, SiteMetrics};

use super::types::{
    HORIZON_YEARS, MonthRecord, Payback, ProjectParameters, ProjectionResult, Sizing, YearRecord,
};

/// Sizes a PV array and simulates its cash flow over [`HORIZON_YEARS`].
///
/// Holds only validated parameters; [`ProjectionEngine::run`] is a pure
/// function of those parameters and the site metrics passed in, so
/// re-running with the same inputs yields an identical result.
///
/// # Examples
///
/// ```
/// use solar_payback::projection::{ProjectParameters, ProjectionEngine};
/// use solar_payback::site::{LocationTable, SiteModel};
///
/// let table = LocationTable::builtin().unwrap();
/// let site = SiteModel::new(&table).metrics("Quito").unwrap();
/// let engine = ProjectionEngine::new(ProjectParameters::default()).unwrap();
/// let result = engine.run(&site).unwrap();
/// assert_eq!(result.years.len(), 25);
/// ```
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: ProjectParameters,
}

impl ProjectionEngine {
    /// Creates an engine after validating every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::InvalidParameter`] found.
    pub fn new(params: ProjectParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ProjectParameters {
        &self.params
    }

    /// Computes capacity, cost, and undegraded generation for a site.
    ///
    /// `capacity = consumption / (insolation * pr * days_per_month)`; annual
    /// and monthly figures use the same day-count convention.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the insolation or performance
    /// ratio is not a positive finite number, or if any derived figure
    /// overflows.
    pub fn size(&self, site: &SiteMetrics) -> Result<Sizing> {
        check_site(site)?;
        let p = &self.params;
        let days = p.days_convention;
        let specific_yield = site.specific_yield();

        let capacity_kwp = ensure_finite(
            "sizing.capacity_kwp",
            p.monthly_consumption_kwh / (specific_yield * days.days_per_month()),
        )?;
        let daily_generation_kwh =
            ensure_finite("sizing.daily_generation_kwh", capacity_kwp * specific_yield)?;
        let monthly_generation_kwh = ensure_finite(
            "sizing.monthly_generation_kwh",
            daily_generation_kwh * days.days_per_month(),
        )?;
        let annual_generation_kwh = ensure_finite(
            "sizing.annual_generation_kwh",
            daily_generation_kwh * days.days_per_year(),
        )?;
        let monthly_saving = ensure_finite(
            "sizing.monthly_saving",
            monthly_generation_kwh * p.energy_price_per_kwh,
        )?;
        let plant_cost = ensure_finite("sizing.plant_cost", capacity_kwp * p.cost_per_kwp)?;
        let rebate_per_year =
            ensure_finite("sizing.rebate_per_year", p.rebate.per_year(plant_cost))?;
        let modules = panel_count(capacity_kwp, p.panel_rating_w).ok_or_else(|| {
            Error::parameter(
                "project.panel_rating_w",
                format!(
                    "{} W modules for {capacity_kwp} kWp exceed the countable range",
                    p.panel_rating_w
                ),
            )
        })?;

        Ok(Sizing {
            capacity_kwp,
            plant_cost,
            panel_count: modules,
            daily_generation_kwh,
            monthly_generation_kwh,
            monthly_saving,
            annual_generation_kwh,
            rebate_per_year,
        })
    }

    /// Builds the record for a 1-indexed year given the cumulative benefit
    /// through the previous year.
    pub fn year_record(&self, sizing: &Sizing, year: u32, cumulative_before: f64) -> YearRecord {
        let p = &self.params;
        let output_factor = p.degradation.output_factor(year);
        let production_kwh = sizing.annual_generation_kwh * output_factor;
        let saving = production_kwh * p.energy_price_per_kwh;
        let rebate = p.rebate.for_year(sizing.plant_cost, year);
        let total_benefit = saving + rebate;

        YearRecord {
            year,
            output_factor,
            production_kwh,
            saving,
            rebate,
            total_benefit,
            cumulative_benefit: cumulative_before + total_benefit,
        }
    }

    /// First-year, undegraded generation and saving per calendar month.
    pub fn monthly_breakdown(&self, site: &SiteMetrics, sizing: &Sizing) -> Vec<MonthRecord> {
        let p = &self.params;
        let days_per_month = p.days_convention.days_per_month();

        MONTH_NAMES
            .iter()
            .zip(&site.monthly_insolation)
            .enumerate()
            .map(|(i, (&name, &insolation))| {
                let daily_kwh = sizing.capacity_kwp * insolation * site.performance_ratio;
                let monthly_kwh = daily_kwh * days_per_month;
                MonthRecord {
                    month: i as u32 + 1,
                    name,
                    insolation,
                    daily_kwh,
                    monthly_kwh,
                    saving: monthly_kwh * p.energy_price_per_kwh,
                }
            })
            .collect()
    }

    /// Sizes the array, simulates years 1..=25, and locates the payback year.
    ///
    /// # Errors
    ///
    /// Fails before building any output if the site metrics are unusable or
    /// the cash flow overflows.
    pub fn run(&self, site: &SiteMetrics) -> Result<ProjectionResult> {
        let sizing = self.size(site)?;

        let mut years = Vec::with_capacity(HORIZON_YEARS as usize);
        let mut cumulative = 0.0;
        for year in 1..=HORIZON_YEARS {
            let record = self.year_record(&sizing, year, cumulative);
            cumulative = record.cumulative_benefit;
            years.push(record);
        }
        ensure_finite("projection.cumulative_benefit", cumulative)?;

        let payback = Payback::search(&years, sizing.plant_cost);
        let monthly = self.monthly_breakdown(site, &sizing);

        Ok(ProjectionResult {
            site: site.clone(),
            parameters: self.params.clone(),
            sizing,
            years,
            monthly,
            payback,
        })
    }
}

/// Validates parameters and runs a single projection.
///
/// # Errors
///
/// Any parameter or site-metric violation.
pub fn project(site: &SiteMetrics, params: &ProjectParameters) -> Result<ProjectionResult> {
    ProjectionEngine::new(params.clone())?.run(site)
}

/// Modules of `rating_w` needed for `capacity_kwp`: `floor(kW / rating) + 1`,
/// or 0 for no array. `None` if the count does not fit in a `u32`.
pub fn panel_count(capacity_kwp: f64, rating_w: f64) -> Option<u32> {
    if capacity_kwp > 0.0 {
        let modules = (capacity_kwp * 1000.0 / rating_w).floor();
        (modules.is_finite() && modules < f64::from(u32::MAX)).then(|| modules as u32 + 1)
    } else {
        Some(0)
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::parameter(
            field,
            format!("resolves to {value}; inputs are out of range"),
        ))
    }
}

fn check_site(site: &SiteMetrics) -> Result<()> {
    if site.monthly_insolation.len() != MONTHS_PER_YEAR {
        return Err(Error::data(
            &site.location,
            format!(
                "expected {MONTHS_PER_YEAR} monthly insolation values, got {}",
                site.monthly_insolation.len()
            ),
        ));
    }
    let h = site.average_insolation;
    if !h.is_finite() || h <= 0.0 {
        return Err(Error::parameter(
            "site.average_insolation",
            format!("must be > 0 for {}, got {h}", site.location),
        ));
    }
    let pr = site.performance_ratio;
    if !pr.is_finite() || pr <= 0.0 {
        return Err(Error::parameter(
            "site.performance_ratio",
            format!("must be > 0 for {}, got {pr}", site.location),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::types::{DaysConvention, DegradationModel, RebateScheme};

    fn site(average_insolation: f64, performance_ratio: f64) -> SiteMetrics {
        SiteMetrics {
            location: "Test".to_string(),
            monthly_insolation: vec![average_insolation; 12],
            temperature_c: 15.0,
            average_insolation,
            performance_ratio,
        }
    }

    fn params() -> ProjectParameters {
        ProjectParameters {
            monthly_consumption_kwh: 300.0,
            energy_price_per_kwh: 0.10,
            cost_per_kwp: 1000.0,
            ..ProjectParameters::default()
        }
    }

    #[test]
    fn sizing_formula() {
        let engine = ProjectionEngine::new(params()).expect("valid params");
        let s = engine.size(&site(5.0, 0.8)).expect("valid site");
        // 300 / (5 * 0.8 * 30.44)
        assert!((s.capacity_kwp - 300.0 / 121.76).abs() < 1e-12);
        assert!((s.plant_cost - s.capacity_kwp * 1000.0).abs() < 1e-9);
        assert!((s.daily_generation_kwh - s.capacity_kwp * 4.0).abs() < 1e-12);
        // monthly generation reproduces the target by construction
        assert!((s.monthly_generation_kwh - 300.0).abs() < 1e-9);
        assert!((s.annual_generation_kwh - 3600.0).abs() < 1e-9);
        assert!((s.monthly_saving - 30.0).abs() < 1e-9);
    }

    #[test]
    fn calendar_year_convention_changes_capacity_not_annual_total() {
        let avg = ProjectionEngine::new(params()).expect("valid params");
        let cal = ProjectionEngine::new(ProjectParameters {
            days_convention: DaysConvention::CalendarYear,
            ..params()
        })
        .expect("valid params");

        let s_avg = avg.size(&site(5.0, 0.8)).expect("valid site");
        let s_cal = cal.size(&site(5.0, 0.8)).expect("valid site");
        assert!(s_cal.capacity_kwp > s_avg.capacity_kwp);
        assert!((s_cal.annual_generation_kwh - 3600.0).abs() < 1e-9);
        assert!((s_cal.monthly_generation_kwh - 300.0).abs() < 1e-9);
    }

    #[test]
    fn zero_insolation_rejected() {
        let engine = ProjectionEngine::new(params()).expect("valid params");
        let err = engine.size(&site(0.0, 0.8)).expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn negative_insolation_and_pr_rejected_even_though_product_is_positive() {
        let engine = ProjectionEngine::new(params()).expect("valid params");
        assert!(engine.size(&site(-5.0, -0.8)).is_err());
    }

    #[test]
    fn invalid_params_fail_before_run() {
        let p = ProjectParameters {
            monthly_consumption_kwh: 0.0,
            ..params()
        };
        assert!(ProjectionEngine::new(p.clone()).is_err());
        assert!(project(&site(5.0, 0.8), &p).is_err());
    }

    #[test]
    fn year_loop_produces_full_horizon() {
        let result = project(&site(5.0, 0.8), &params()).expect("valid run");
        assert_eq!(result.years.len(), HORIZON_YEARS as usize);
        for (i, r) in result.years.iter().enumerate() {
            assert_eq!(r.year, i as u32 + 1);
        }
        assert_eq!(result.monthly.len(), 12);
    }

    #[test]
    fn year_record_fields_are_consistent() {
        let result = project(&site(5.0, 0.8), &params()).expect("valid run");
        let mut running = 0.0;
        for r in &result.years {
            assert!((r.production_kwh - 3600.0 * r.output_factor).abs() < 1e-9);
            assert!((r.saving - r.production_kwh * 0.10).abs() < 1e-9);
            assert!((r.total_benefit - (r.saving + r.rebate)).abs() < 1e-12);
            running += r.total_benefit;
            assert!((r.cumulative_benefit - running).abs() < 1e-9);
        }
    }

    #[test]
    fn first_year_degradation_applies_to_year_one() {
        let result = project(&site(5.0, 0.8), &params()).expect("valid run");
        assert!((result.years[0].production_kwh - 3600.0 * 0.98).abs() < 1e-9);
    }

    #[test]
    fn uniform_degradation_leaves_year_one_at_nameplate() {
        let p = ProjectParameters {
            degradation: DegradationModel::Uniform { annual: 0.005 },
            ..params()
        };
        let result = project(&site(5.0, 0.8), &p).expect("valid run");
        assert!((result.years[0].production_kwh - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn rebate_stops_after_its_horizon() {
        let p = ProjectParameters {
            rebate: RebateScheme::PlantCostAmortization { years: 10 },
            ..params()
        };
        let result = project(&site(5.0, 0.8), &p).expect("valid run");
        let per_year = result.plant_cost() / 10.0;
        for r in &result.years {
            let expected = if r.year <= 10 { per_year } else { 0.0 };
            assert_eq!(r.rebate, expected);
        }
        assert_eq!(result.sizing.rebate_per_year, per_year);
    }

    #[test]
    fn amortization_shortens_payback() {
        let without = project(&site(5.0, 0.8), &params()).expect("valid run");
        let p = ProjectParameters {
            rebate: RebateScheme::PlantCostAmortization { years: 10 },
            ..params()
        };
        let with = project(&site(5.0, 0.8), &p).expect("valid run");
        let year = with.payback.year().expect("savings plus rebates repay the plant");
        assert!(year <= 10);
        assert!(without.payback.year().is_none_or(|y| y > year));
    }

    #[test]
    fn zero_price_without_rebate_never_pays_back() {
        let p = ProjectParameters {
            energy_price_per_kwh: 0.0,
            ..params()
        };
        let result = project(&site(5.0, 0.8), &p).expect("valid run");
        assert_eq!(result.payback, Payback::BeyondHorizon);
        assert_eq!(result.years[24].cumulative_benefit, 0.0);
    }

    #[test]
    fn free_plant_pays_back_in_year_one() {
        let p = ProjectParameters {
            cost_per_kwp: 0.0,
            ..params()
        };
        let result = project(&site(5.0, 0.8), &p).expect("valid run");
        assert_eq!(result.payback, Payback::Year(1));
    }

    #[test]
    fn monthly_breakdown_tracks_monthly_insolation() {
        let mut s = site(5.0, 0.8);
        s.monthly_insolation = vec![4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0];
        let result = project(&s, &params()).expect("valid run");
        let jan = &result.monthly[0];
        let dec = &result.monthly[11];
        assert_eq!(jan.name, "Jan");
        assert_eq!(dec.month, 12);
        assert!((dec.daily_kwh / jan.daily_kwh - 1.5).abs() < 1e-12);
        assert!((jan.monthly_kwh - jan.daily_kwh * 30.44).abs() < 1e-9);
        assert!((jan.saving - jan.monthly_kwh * 0.10).abs() < 1e-12);
    }

    #[test]
    fn malformed_monthly_sequence_rejected() {
        let mut s = site(5.0, 0.8);
        s.monthly_insolation.pop();
        let err = project(&s, &params()).expect_err("must fail");
        assert!(matches!(err, Error::InvalidData { .. }));
    }

    #[test]
    fn panel_count_matches_reference_rule() {
        assert_eq!(panel_count(0.0, 550.0), Some(0));
        assert_eq!(panel_count(2.5468, 550.0), Some(5));
        // exact multiples still round up by one module
        assert_eq!(panel_count(1.1, 550.0), Some(3));
    }

    #[test]
    fn panel_count_beyond_u32_is_none() {
        assert_eq!(panel_count(1.0e12, 1.0), None);
        assert_eq!(panel_count(2.5, 1.0e-300), None);
    }

    #[test]
    fn tiny_panel_rating_rejected() {
        let p = ProjectParameters {
            panel_rating_w: 1.0e-300,
            ..params()
        };
        let err = project(&site(5.0, 0.8), &p).expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(err.field(), "project.panel_rating_w");
    }

    #[test]
    fn huge_consumption_rejected_instead_of_overflowing() {
        let p = ProjectParameters {
            monthly_consumption_kwh: 1.0e308,
            ..params()
        };
        let err = project(&site(5.0, 0.8), &p).expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(err.field(), "sizing.annual_generation_kwh");
    }

    #[test]
    fn infinite_plant_cost_rejected() {
        let p = ProjectParameters {
            cost_per_kwp: 1.0e308,
            rebate: RebateScheme::PlantCostAmortization { years: 10 },
            ..params()
        };
        let err = project(&site(5.0, 0.8), &p).expect_err("must fail");
        assert_eq!(err.field(), "sizing.plant_cost");
    }

    #[test]
    fn overflowing_cash_flow_rejected() {
        let p = ProjectParameters {
            energy_price_per_kwh: 1.0e305,
            ..params()
        };
        let engine = ProjectionEngine::new(p).expect("finite inputs pass validation");
        let sizing = engine.size(&site(5.0, 0.8)).expect("sizing stays finite");
        assert!(sizing.monthly_saving.is_finite());

        let err = engine.run(&site(5.0, 0.8)).expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(err.field(), "projection.cumulative_benefit");
    }
}
