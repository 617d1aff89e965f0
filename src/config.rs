//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::projection::{DaysConvention, DegradationModel, ProjectParameters, RebateScheme};
use crate::site::LocationTable;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `quito_residential` preset. Load
/// from TOML with [`ScenarioConfig::from_toml_file`] or pick a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Which reference location to size for.
    #[serde(default)]
    pub site: SiteConfig,
    /// Consumption, pricing, degradation, and rebate parameters.
    #[serde(default)]
    pub project: ProjectParameters,
}

/// Location selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Location name, matched case-insensitively against the table.
    pub location: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            location: "Quito".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"project.monthly_consumption_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<Error> for ConfigError {
    fn from(e: Error) -> Self {
        Self {
            field: e.field().to_string(),
            message: e.message().to_string(),
        }
    }
}

impl ScenarioConfig {
    /// Residential customer in Quito, no incentives.
    pub fn quito_residential() -> Self {
        Self::default()
    }

    /// Guayaquil household deducting the plant cost over ten years.
    pub fn guayaquil_amortized() -> Self {
        Self {
            site: SiteConfig {
                location: "Guayaquil".to_string(),
            },
            project: ProjectParameters {
                monthly_consumption_kwh: 450.0,
                rebate: RebateScheme::PlantCostAmortization { years: 10 },
                ..ProjectParameters::default()
            },
        }
    }

    /// Small commercial site in Manta with a fixed incentive and
    /// calendar-year accounting.
    pub fn manta_commercial() -> Self {
        Self {
            site: SiteConfig {
                location: "Manta".to_string(),
            },
            project: ProjectParameters {
                monthly_consumption_kwh: 2500.0,
                energy_price_per_kwh: 0.105,
                cost_per_kwp: 950.0,
                days_convention: DaysConvention::CalendarYear,
                degradation: DegradationModel::Uniform { annual: 0.006 },
                rebate: RebateScheme::FixedIncentive {
                    total: 5000.0,
                    years: 5,
                },
                ..ProjectParameters::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["quito_residential", "guayaquil_amortized", "manta_commercial"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "quito_residential" => Ok(Self::quito_residential()),
            "guayaquil_amortized" => Ok(Self::guayaquil_amortized()),
            "manta_commercial" => Ok(Self::manta_commercial()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates the location against `table` and every project parameter.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self, table: &LocationTable) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = table.get(&self.site.location) {
            errors.push(ConfigError {
                field: "site.location".into(),
                message: format!("\"{}\": {}", self.site.location, e.message()),
            });
        }

        errors.extend(self.project.violations().into_iter().map(ConfigError::from));
        errors
    }
}
