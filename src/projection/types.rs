//! Projection inputs, named convention options, and per-year output records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::site::SiteMetrics;

/// Fixed simulation horizon (years).
pub const HORIZON_YEARS: u32 = 25;
/// Average days per month used by the sizing formula.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;
/// Default plant cost coefficient (currency per installed kWp).
pub const DEFAULT_COST_PER_KWP: f64 = 1100.0;
/// Default module nameplate rating used for the panel-count estimate (W).
pub const DEFAULT_PANEL_RATING_W: f64 = 550.0;
/// Default rebate amortization horizon (years).
pub const DEFAULT_REBATE_YEARS: u32 = 10;
/// Default degradation in the first year of operation.
pub const DEFAULT_FIRST_YEAR_DEGRADATION: f64 = 0.02;
/// Default degradation in every subsequent year.
pub const DEFAULT_ANNUAL_DEGRADATION: f64 = 0.005;

/// How daily energy figures are projected to monthly and annual totals.
///
/// One convention applies to every projection in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysConvention {
    /// 30.44 days per month; a year is 12 such months (365.28 days).
    #[default]
    AverageMonth,
    /// 365 days per year; a month is 365 / 12 days.
    CalendarYear,
}

impl DaysConvention {
    pub fn days_per_month(self) -> f64 {
        match self {
            Self::AverageMonth => AVERAGE_DAYS_PER_MONTH,
            Self::CalendarYear => 365.0 / 12.0,
        }
    }

    pub fn days_per_year(self) -> f64 {
        match self {
            Self::AverageMonth => 12.0 * AVERAGE_DAYS_PER_MONTH,
            Self::CalendarYear => 365.0,
        }
    }
}

fn default_first_year_degradation() -> f64 {
    DEFAULT_FIRST_YEAR_DEGRADATION
}

fn default_annual_degradation() -> f64 {
    DEFAULT_ANNUAL_DEGRADATION
}

fn default_rebate_years() -> u32 {
    DEFAULT_REBATE_YEARS
}

/// Panel output degradation over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DegradationModel {
    /// Distinct first-year loss, then a constant annual attenuation:
    /// `factor(i) = (1 - first_year) * (1 - annual)^(i - 1)`.
    FirstYear {
        #[serde(default = "default_first_year_degradation")]
        first_year: f64,
        #[serde(default = "default_annual_degradation")]
        annual: f64,
    },
    /// Same rate every year, no loss in year 1:
    /// `factor(i) = (1 - annual)^(i - 1)`.
    Uniform {
        #[serde(default = "default_annual_degradation")]
        annual: f64,
    },
}

impl Default for DegradationModel {
    fn default() -> Self {
        Self::FirstYear {
            first_year: DEFAULT_FIRST_YEAR_DEGRADATION,
            annual: DEFAULT_ANNUAL_DEGRADATION,
        }
    }
}

impl DegradationModel {
    /// Output factor relative to nameplate for a 1-indexed year.
    pub fn output_factor(&self, year: u32) -> f64 {
        let elapsed = year.saturating_sub(1) as i32;
        match *self {
            Self::FirstYear { first_year, annual } => {
                (1.0 - first_year) * (1.0 - annual).powi(elapsed)
            }
            Self::Uniform { annual } => (1.0 - annual).powi(elapsed),
        }
    }

    fn violations(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        let rates = match *self {
            Self::FirstYear { first_year, annual } => vec![
                ("project.degradation.first_year", first_year),
                ("project.degradation.annual", annual),
            ],
            Self::Uniform { annual } => vec![("project.degradation.annual", annual)],
        };
        for (field, rate) in rates {
            if !(0.0..1.0).contains(&rate) {
                errors.push(Error::parameter(
                    field,
                    format!("must be a fraction in [0, 1), got {rate}"),
                ));
            }
        }
        errors
    }
}

/// Incentive paid back in equal yearly amounts over a fixed number of years.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RebateScheme {
    /// No incentive.
    #[default]
    None,
    /// The plant cost itself amortized evenly (tax-deduction style).
    PlantCostAmortization {
        #[serde(default = "default_rebate_years")]
        years: u32,
    },
    /// A fixed incentive amount divided evenly across the years.
    FixedIncentive {
        total: f64,
        #[serde(default = "default_rebate_years")]
        years: u32,
    },
}

impl RebateScheme {
    /// Number of years the rebate is paid (0 when disabled).
    pub fn years(&self) -> u32 {
        match *self {
            Self::None => 0,
            Self::PlantCostAmortization { years } | Self::FixedIncentive { years, .. } => years,
        }
    }

    /// Total incentive for a plant of the given cost.
    pub fn total(&self, plant_cost: f64) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::PlantCostAmortization { .. } => plant_cost,
            Self::FixedIncentive { total, .. } => total,
        }
    }

    /// Equal yearly installment; zero when disabled.
    pub fn per_year(&self, plant_cost: f64) -> f64 {
        match self.years() {
            0 => 0.0,
            years => self.total(plant_cost) / f64::from(years),
        }
    }

    /// Rebate paid in a 1-indexed year: the installment while `year <= years`, else 0.
    pub fn for_year(&self, plant_cost: f64, year: u32) -> f64 {
        if year >= 1 && year <= self.years() {
            self.per_year(plant_cost)
        } else {
            0.0
        }
    }

    fn violations(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        if let Self::PlantCostAmortization { years } | Self::FixedIncentive { years, .. } = *self {
            if years == 0 {
                errors.push(Error::parameter("project.rebate.years", "must be >= 1"));
            } else if years > HORIZON_YEARS {
                errors.push(Error::parameter(
                    "project.rebate.years",
                    format!("{years} exceeds the {HORIZON_YEARS}-year simulation horizon"),
                ));
            }
        }
        if let Self::FixedIncentive { total, .. } = *self {
            if !total.is_finite() || total < 0.0 {
                errors.push(Error::parameter(
                    "project.rebate.total",
                    format!("must be a finite amount >= 0, got {total}"),
                ));
            }
        }
        errors
    }
}

/// User-supplied project parameters, validated at entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectParameters {
    /// Target monthly consumption to offset (kWh, > 0).
    pub monthly_consumption_kwh: f64,
    /// Energy unit price (currency per kWh, >= 0).
    pub energy_price_per_kwh: f64,
    /// Plant cost coefficient (currency per installed kWp, >= 0).
    pub cost_per_kwp: f64,
    /// Module rating for the panel-count estimate (W, > 0).
    pub panel_rating_w: f64,
    /// Daily-to-monthly/annual projection convention.
    pub days_convention: DaysConvention,
    /// Output degradation over the horizon.
    pub degradation: DegradationModel,
    /// Optional rebate / tax amortization.
    pub rebate: RebateScheme,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            monthly_consumption_kwh: 300.0,
            energy_price_per_kwh: 0.092,
            cost_per_kwp: DEFAULT_COST_PER_KWP,
            panel_rating_w: DEFAULT_PANEL_RATING_W,
            days_convention: DaysConvention::default(),
            degradation: DegradationModel::default(),
            rebate: RebateScheme::default(),
        }
    }
}

impl ProjectParameters {
    /// Every constraint violation, in field order.
    pub fn violations(&self) -> Vec<Error> {
        let mut errors = Vec::new();

        let c = self.monthly_consumption_kwh;
        if !c.is_finite() || c <= 0.0 {
            errors.push(Error::parameter(
                "project.monthly_consumption_kwh",
                format!("must be > 0, got {c}"),
            ));
        }
        let p = self.energy_price_per_kwh;
        if !p.is_finite() || p < 0.0 {
            errors.push(Error::parameter(
                "project.energy_price_per_kwh",
                format!("must be >= 0, got {p}"),
            ));
        }
        let k = self.cost_per_kwp;
        if !k.is_finite() || k < 0.0 {
            errors.push(Error::parameter(
                "project.cost_per_kwp",
                format!("must be >= 0, got {k}"),
            ));
        }
        let w = self.panel_rating_w;
        if !w.is_finite() || w <= 0.0 {
            errors.push(Error::parameter(
                "project.panel_rating_w",
                format!("must be > 0, got {w}"),
            ));
        }

        errors.extend(self.degradation.violations());
        errors.extend(self.rebate.violations());
        errors
    }

    /// Checks all constraints, failing on the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::InvalidParameter`] found.
    pub fn validate(&self) -> Result<()> {
        match self.violations().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// System sizing derived from site metrics and parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sizing {
    /// Required nameplate capacity (kWp).
    pub capacity_kwp: f64,
    /// Estimated plant cost (currency).
    pub plant_cost: f64,
    /// Estimated modules of the configured rating.
    pub panel_count: u32,
    /// Average daily generation in year 1 before degradation (kWh).
    pub daily_generation_kwh: f64,
    /// Average monthly generation in year 1 before degradation (kWh).
    pub monthly_generation_kwh: f64,
    /// Average monthly saving in year 1 before degradation (currency).
    pub monthly_saving: f64,
    /// Annual generation before degradation (kWh).
    pub annual_generation_kwh: f64,
    /// Rebate installment paid in each rebate year (currency).
    pub rebate_per_year: f64,
}

/// One row of the cash-flow table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    /// Year index, 1-based.
    pub year: u32,
    /// Degradation-adjusted output factor.
    pub output_factor: f64,
    /// Energy produced this year (kWh).
    pub production_kwh: f64,
    /// Energy savings this year (currency).
    pub saving: f64,
    /// Rebate installment this year (currency, 0 after the rebate horizon).
    pub rebate: f64,
    /// `saving + rebate`.
    pub total_benefit: f64,
    /// Running sum of `total_benefit` over years 1..=year.
    pub cumulative_benefit: f64,
}

impl fmt::Display for YearRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={:>2} | factor={:.4} | production={:>9.1} kWh | saving={:>9.2}  \
             rebate={:>9.2}  benefit={:>9.2} | cumulative={:>10.2}",
            self.year,
            self.output_factor,
            self.production_kwh,
            self.saving,
            self.rebate,
            self.total_benefit,
            self.cumulative_benefit,
        )
    }
}

/// First-year, undegraded generation for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRecord {
    /// Calendar month, 1-based.
    pub month: u32,
    /// Short month label.
    pub name: &'static str,
    /// Average daily insolation for the month (kWh/m²/day).
    pub insolation: f64,
    /// Daily generation (kWh).
    pub daily_kwh: f64,
    /// Monthly generation (kWh).
    pub monthly_kwh: f64,
    /// Monthly saving (currency).
    pub saving: f64,
}

/// Outcome of the payback search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    /// First year whose cumulative benefit reaches the plant cost.
    Year(u32),
    /// Cumulative benefit stays below the plant cost through the horizon.
    BeyondHorizon,
}

impl Payback {
    /// Finds the smallest year whose cumulative benefit is `>= plant_cost`.
    pub fn search(years: &[YearRecord], plant_cost: f64) -> Self {
        years
            .iter()
            .find(|r| r.cumulative_benefit >= plant_cost)
            .map_or(Self::BeyondHorizon, |r| Self::Year(r.year))
    }

    pub fn year(self) -> Option<u32> {
        match self {
            Self::Year(y) => Some(y),
            Self::BeyondHorizon => None,
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => write!(f, "year {y}"),
            Self::BeyondHorizon => write!(f, "beyond {HORIZON_YEARS}-year horizon"),
        }
    }
}

/// Complete output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    /// Site metrics the run was based on.
    pub site: SiteMetrics,
    /// Parameters the run was based on.
    pub parameters: ProjectParameters,
    /// Capacity, cost, and first-year generation figures.
    pub sizing: Sizing,
    /// Cash-flow table, years 1..=25.
    pub years: Vec<YearRecord>,
    /// Month-by-month first-year breakdown.
    pub monthly: Vec<MonthRecord>,
    /// Payback year or beyond horizon.
    pub payback: Payback,
}

impl ProjectionResult {
    pub fn capacity_kwp(&self) -> f64 {
        self.sizing.capacity_kwp
    }

    pub fn plant_cost(&self) -> f64 {
        self.sizing.plant_cost
    }

    /// Record for a 1-indexed year, if within the horizon.
    pub fn year(&self, year: u32) -> Option<&YearRecord> {
        year.checked_sub(1).and_then(|i| self.years.get(i as usize))
    }
}
