use std::path::PathBuf;

use clap::Parser;

/// Size a PV array for a target consumption and project its payback.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Load scenario from a TOML file.
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (quito_residential, guayaquil_amortized, manta_commercial).
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the scenario location.
    #[arg(long)]
    pub location: Option<String>,

    /// Override the target monthly consumption (kWh).
    #[arg(long, allow_negative_numbers = true)]
    pub consumption: Option<f64>,

    /// Override the energy price (per kWh).
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Replace the built-in location table with a TOML file.
    #[arg(long)]
    pub locations: Option<PathBuf>,

    /// Write the yearly cash-flow table to CSV.
    #[arg(long)]
    pub table_out: Option<PathBuf>,

    /// Write the monthly breakdown to CSV.
    #[arg(long)]
    pub monthly_out: Option<PathBuf>,

    /// Print the location table with derived metrics and exit.
    #[arg(long, default_value_t = false)]
    pub list_locations: bool,

    /// Start the REST API server instead of printing a report.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = false)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Args {
    /// Preset to fall back to when neither `--scenario` nor `--preset` is given.
    pub const DEFAULT_PRESET: &'static str = "quito_residential";

    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(Self::DEFAULT_PRESET)
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn supports_scenario_cli() {
        let args = Args::try_parse_from(["solar-payback", "--scenario", "scenario.toml"])
            .expect("parse should succeed");
        assert_eq!(
            args.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(args.preset.is_none());
    }

    #[test]
    fn supports_preset_cli() {
        let args = Args::try_parse_from(["solar-payback", "--preset", "manta_commercial"])
            .expect("parse should succeed");
        assert_eq!(args.preset_name(), "manta_commercial");
    }

    #[test]
    fn defaults_to_quito_preset() {
        let args = Args::try_parse_from(["solar-payback"]).expect("parse should succeed");
        assert_eq!(args.preset_name(), "quito_residential");
        assert!(!args.list_locations);
    }

    #[test]
    fn scenario_and_preset_are_mutually_exclusive() {
        let result = Args::try_parse_from([
            "solar-payback",
            "--scenario",
            "a.toml",
            "--preset",
            "quito_residential",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn numeric_overrides_parse() {
        let args = Args::try_parse_from([
            "solar-payback",
            "--consumption",
            "450",
            "--price",
            "0.11",
            "--location",
            "Loja",
        ])
        .expect("parse should succeed");
        assert_eq!(args.consumption, Some(450.0));
        assert_eq!(args.price, Some(0.11));
        assert_eq!(args.location.as_deref(), Some("Loja"));
    }

    #[test]
    fn non_numeric_consumption_rejected() {
        assert!(Args::try_parse_from(["solar-payback", "--consumption", "lots"]).is_err());
    }
}
