//! PV payback entry point: CLI wiring and config-driven projection runs.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};

use solar_payback::config::ScenarioConfig;
use solar_payback::io::export::{export_monthly_csv, export_years_csv};
use solar_payback::logging::init_logging;
use solar_payback::runner::run_scenario;
use solar_payback::site::{LocationTable, SiteModel};

use cli::Args;

/// Loads the location table: `--locations` file if given, else the built-in one.
fn load_table(args: &Args) -> Result<LocationTable> {
    let table = match &args.locations {
        Some(path) => LocationTable::from_toml_file(path)
            .with_context(|| format!("failed to load location table {}", path.display()))?,
        None => LocationTable::builtin().context("failed to load built-in location table")?,
    };
    info!(locations = table.len(), "location table loaded");
    Ok(table)
}

/// Resolves the scenario source and applies command-line overrides.
///
/// `--scenario` takes priority, then `--preset`, then the default preset.
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut scenario = match &args.scenario {
        Some(path) => {
            info!(path = %path.display(), "loading scenario file");
            ScenarioConfig::from_toml_file(path)?
        }
        None => {
            info!(preset = args.preset_name(), "using preset");
            ScenarioConfig::from_preset(args.preset_name())?
        }
    };

    if let Some(location) = &args.location {
        scenario.site.location.clone_from(location);
    }
    if let Some(consumption) = args.consumption {
        scenario.project.monthly_consumption_kwh = consumption;
    }
    if let Some(price) = args.price {
        scenario.project.energy_price_per_kwh = price;
    }
    Ok(scenario)
}

fn print_locations(table: &LocationTable) -> Result<()> {
    let metrics = SiteModel::new(table).all_metrics()?;
    for m in &metrics {
        println!(
            "{:<14} HSP={:.3} h  T={:>4.1} °C  PR={:.4}",
            m.location, m.average_insolation, m.temperature_c, m.performance_ratio
        );
    }
    Ok(())
}

fn main() {
    if let Err(e) = init_logging(Level::INFO) {
        eprintln!("warning: logging not initialised: {e}");
    }

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let table = load_table(args)?;

    if args.list_locations {
        return print_locations(&table);
    }

    let scenario = load_scenario(args)?;

    let errors = scenario.validate(&table);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    #[cfg(feature = "api")]
    if args.serve {
        return serve(table, scenario, args.port);
    }

    let run = run_scenario(&scenario, &table)?;

    for r in &run.result.years {
        println!("{r}");
    }
    println!("\n{}", run.summary);

    if let Some(path) = &args.table_out {
        export_years_csv(&run.result, path)
            .with_context(|| format!("failed to write CSV {}", path.display()))?;
        info!(path = %path.display(), "yearly table written");
    }
    if let Some(path) = &args.monthly_out {
        export_monthly_csv(&run.result, path)
            .with_context(|| format!("failed to write CSV {}", path.display()))?;
        info!(path = %path.display(), "monthly breakdown written");
    }

    Ok(())
}

#[cfg(feature = "api")]
fn serve(table: LocationTable, scenario: ScenarioConfig, port: u16) -> Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(solar_payback::api::AppState {
        table,
        defaults: scenario.project,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(solar_payback::api::serve(state, addr))
        .with_context(|| format!("API server on {addr} failed"))
}
