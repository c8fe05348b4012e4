//! EV demand planner entry point: CLI wiring and config-driven pipeline runs.

mod cli;

use std::fs;
use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Command, CliOptions, ConfigSource};
use ev_demand_planner::config::PlannerConfig;
use ev_demand_planner::forecast::{DailyForecast, DemandQuery};
use ev_demand_planner::io::artifact;
use ev_demand_planner::io::export::{export_forecast_csv, export_training_csv};
use ev_demand_planner::pipeline::train_from_config;
use ev_demand_planner::planning::{PlanningState, run_workflow};
use ev_demand_planner::reporting::render_report;

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolves the configuration source and applies CLI overrides.
fn load_config(cli: &CliOptions) -> Result<PlannerConfig, String> {
    let mut cfg = match &cli.common.config {
        ConfigSource::File(path) => PlannerConfig::from_toml_file(path),
        ConfigSource::Preset(name) => PlannerConfig::from_preset(name),
    }
    .map_err(|e| e.to_string())?;

    if let Some(seed) = cli.common.seed {
        cfg.training.seed = seed;
    }
    if let Some(ref dir) = cli.common.data_dir {
        cfg.data.data_dir = dir.clone();
    }
    if let Some(ref path) = cli.common.model {
        cfg.model.path = path.clone();
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"));
    }
    Ok(cfg)
}

fn run_train(cfg: &PlannerConfig, features_out: Option<&Path>) -> Result<(), String> {
    let (set, model) = train_from_config(cfg).map_err(|e| format!("error: {e}"))?;
    println!("Trained {} on {} hourly rows", model.kind(), set.len());
    println!("{}", model.metrics());

    artifact::save(&cfg.model.path, &model).map_err(|e| format!("error: {e}"))?;
    eprintln!("Model written to {}", cfg.model.path.display());

    if let Some(path) = features_out {
        export_training_csv(&set.features, &set.targets, path)
            .map_err(|e| format!("error: failed to write CSV: {e}"))?;
        eprintln!("Training table written to {}", path.display());
    }
    Ok(())
}

fn run_predict(
    cfg: &PlannerConfig,
    query: DemandQuery,
    forecast_out: Option<&Path>,
) -> Result<(), String> {
    let model = artifact::load(&cfg.model.path).map_err(|e| format!("error: {e}"))?;
    let forecast = DailyForecast::predict(&model, query).map_err(|e| format!("error: {e}"))?;

    println!("Predicted charging volume: {:.2} kWh", forecast.point_kwh());
    for (hour, kwh) in forecast.hourly_kwh().iter().enumerate() {
        println!("{hour:02}:00  {kwh:>10.2} kWh");
    }
    println!("\n{}", forecast.summary());

    if let Some(path) = forecast_out {
        export_forecast_csv(&forecast, path)
            .map_err(|e| format!("error: failed to write CSV: {e}"))?;
        eprintln!("Forecast written to {}", path.display());
    }
    Ok(())
}

fn run_plan(cfg: &PlannerConfig, query: DemandQuery, report_out: Option<&Path>) -> Result<(), String> {
    // Without a model the workflow falls back to its default demand text.
    let model = artifact::load_optional(&cfg.model.path);
    let demand = match &model {
        Some(m) => DailyForecast::predict(m, query)
            .map_err(|e| format!("error: {e}"))?
            .summary(),
        None => String::new(),
    };

    let state =
        run_workflow(PlanningState::with_demand(demand)).map_err(|e| format!("error: {e}"))?;
    info!(zones = ?state.hot_zones, "planning workflow finished");

    let metrics = model.as_ref().map(|m| m.metrics());
    let report = render_report(
        &state.demand_summary,
        &state.recommendations,
        metrics.as_ref(),
        chrono::Local::now().naive_local(),
    );

    match report_out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("error: cannot create {}: {e}", parent.display()))?;
            }
            fs::write(path, &report)
                .map_err(|e| format!("error: failed to write report: {e}"))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    init_logging();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let outcome = match &cli.command {
        Command::Train { features_out } => run_train(&cfg, features_out.as_deref()),
        Command::Predict {
            query,
            forecast_out,
        } => run_predict(&cfg, *query, forecast_out.as_deref()),
        Command::Plan { query, report_out } => run_plan(&cfg, *query, report_out.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        process::exit(1);
    }
}
