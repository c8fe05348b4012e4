use std::env;
use std::path::PathBuf;

use ev_demand_planner::forecast::{DemandQuery, parse_day};

/// Where the planner configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Preset(String),
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonOptions {
    pub config: ConfigSource,
    pub seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Aggregate station telemetry, fit, validate, and persist a model.
    Train {
        features_out: Option<PathBuf>,
    },
    /// Predict demand for one query and its 24-hour curve.
    Predict {
        query: DemandQuery,
        forecast_out: Option<PathBuf>,
    },
    /// Forecast, run the planning workflow, and render the report.
    Plan {
        query: DemandQuery,
        report_out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub common: CommonOptions,
    pub command: Command,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let Some((sub, rest)) = args.split_first() else {
        return Err("missing subcommand (expected train, predict, or plan)".to_string());
    };
    match sub.as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            std::process::exit(0);
        }
        "train" | "predict" | "plan" => parse_options(sub, rest),
        other => Err(format!("unknown subcommand: {other}")),
    }
}

fn parse_options(sub: &str, args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config_path = None;
    let mut preset = None;
    let mut seed = None;
    let mut data_dir = None;
    let mut model = None;
    let mut out = None;
    let mut hour = 12u32;
    let mut day = 0u32;
    let mut s_price = 0.5f64;
    let mut e_price = 1.0f64;

    let out_flag = match sub {
        "train" => "--features-out",
        "predict" => "--forecast-out",
        _ => "--report-out",
    };

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if config_path.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                seed = Some(value);
            }
            "--data-dir" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --data-dir (expected a directory path)",
                )?;
                data_dir = Some(PathBuf::from(path));
            }
            "--model" | "--model-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --model (expected a file path)")?;
                model = Some(PathBuf::from(path));
            }
            "--hour" if sub != "train" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --hour (expected 0-23)")?;
                hour = raw
                    .parse::<u32>()
                    .ok()
                    .filter(|h| *h < 24)
                    .ok_or_else(|| format!("--hour value \"{raw}\" is not in 0-23"))?;
            }
            "--day" if sub != "train" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --day (expected a day name or 0-6)",
                )?;
                day = parse_day(raw)
                    .ok_or_else(|| format!("--day value \"{raw}\" is not a day of week"))?;
            }
            "--s-price" if sub != "train" => {
                i += 1;
                s_price = parse_price(args, i, "--s-price")?;
            }
            "--e-price" if sub != "train" => {
                i += 1;
                e_price = parse_price(args, i, "--e-price")?;
            }
            f if f == out_flag => {
                i += 1;
                let path =
                    args.next_or_err(i, &format!("missing value for {out_flag} (expected a file path)"))?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err(format!("{out_flag} provided more than once"));
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument for {sub}: {other}")),
        }
        i += 1;
    }

    let config = match (config_path, preset) {
        (Some(_), Some(_)) => {
            return Err(
                "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                    .to_string(),
            );
        }
        (Some(path), None) => ConfigSource::File(path),
        (None, Some(name)) => ConfigSource::Preset(name),
        (None, None) => ConfigSource::Preset("baseline".to_string()),
    };

    let command = match sub {
        "train" => Command::Train { features_out: out },
        "predict" => Command::Predict {
            query: DemandQuery::new(hour, day, s_price, e_price),
            forecast_out: out,
        },
        _ => Command::Plan {
            query: DemandQuery::new(hour, day, s_price, e_price),
            report_out: out,
        },
    };

    Ok(CliOptions {
        common: CommonOptions {
            config,
            seed,
            data_dir,
            model,
        },
        command,
    })
}

fn parse_price(args: &[String], index: usize, flag: &str) -> Result<f64, String> {
    let raw = args.next_or_err(
        index,
        &format!("missing value for {flag} (expected a price in CNY/kWh)"),
    )?;
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| format!("{flag} value \"{raw}\" is not a non-negative price"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("ev-demand-planner: EV charging demand forecasting and planning");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  ev-demand-planner train   [COMMON] [--features-out <path>]");
    eprintln!("  ev-demand-planner predict [COMMON] [QUERY] [--forecast-out <path>]");
    eprintln!("  ev-demand-planner plan    [COMMON] [QUERY] [--report-out <path>]");
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  --config <path>      Load configuration from a TOML file");
    eprintln!("  --preset <name>      Use a built-in preset (baseline, boosted, quick)");
    eprintln!("  --seed <u64>         Override the training seed");
    eprintln!("  --data-dir <path>    Override the station telemetry directory");
    eprintln!("  --model <path>       Override the model artifact path");
    eprintln!();
    eprintln!("Query options (defaults in brackets):");
    eprintln!("  --hour <0-23>        Hour of day [12]");
    eprintln!("  --day <name|0-6>     Day of week, Monday = 0 [Monday]");
    eprintln!("  --s-price <f64>      Service fee, CNY/kWh [0.5]");
    eprintln!("  --e-price <f64>      Electricity price, CNY/kWh [1.0]");
    eprintln!();
    eprintln!("Set RUST_LOG to control log verbosity (default: info).");
}
