use anyhow::{ensure, Context, Result};
use clap::Parser;
use mycoscape_lib::data::WeatherSample;
use mycoscape_lib::engine::init_logging;
use mycoscape_lib::engine::metrics::init_logging_with_level;
use mycoscape_lib::{demo_landscape, load_map, Engine, GridStats, ParameterSet};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless landscape ecology simulation", long_about = None)]
struct Args {
    /// Parameter file (TOML); missing or invalid entries use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Landscape map file; the built-in demo map is used when absent
    #[arg(short, long)]
    map: Option<PathBuf>,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Simulated days to run
    #[arg(short, long, default_value_t = 30.0)]
    days: f64,

    /// Time-scale multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Wall-clock seconds fed to each advance call
    #[arg(long, default_value_t = 0.25)]
    frame_seconds: f64,

    /// Log grid statistics every N simulated days (0 disables)
    #[arg(long, default_value_t = 5.0)]
    report_every: f64,

    /// Remediate around X,Y before the run starts (repeatable)
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    remediate: Vec<(i32, i32)>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y in `{s}`: {e}"))?;
    Ok((x, y))
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    params: String,
    width: u16,
    height: u16,
    elapsed_days: f64,
    weather_steps: u64,
    ecology_steps: u64,
    storms: u64,
    dropped_ecology_days: f64,
    dropped_weather_days: f64,
    wall_seconds: f64,
    weather: WeatherSample,
    stats: GridStats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match verbose_level(args.verbose) {
        Some(level) => init_logging_with_level(level),
        None => init_logging(),
    }

    ensure!(
        args.days.is_finite() && args.days >= 0.0,
        "--days must be a non-negative number"
    );
    ensure!(
        args.speed.is_finite() && args.speed > 0.0,
        "--speed must be positive for a headless run"
    );
    ensure!(
        args.frame_seconds.is_finite() && args.frame_seconds > 0.0,
        "--frame-seconds must be positive"
    );

    let params = match &args.config {
        Some(path) => ParameterSet::load_or_default(path),
        None => ParameterSet::default(),
    };
    let landscape = match &args.map {
        Some(path) => {
            load_map(path).with_context(|| format!("loading map {}", path.display()))?
        }
        None => demo_landscape().context("parsing built-in demo map")?,
    };

    let mut engine = Engine::new(&landscape, params, args.seed).context("building engine")?;
    engine.set_speed(args.speed);

    for &(x, y) in &args.remediate {
        if engine.apply_remediation(x, y) == 0 {
            tracing::warn!(x, y, "Remediation target outside the map, skipped");
        }
    }

    let mut next_report = args.report_every;
    while engine.elapsed_days() < args.days {
        engine.advance(args.frame_seconds);
        if args.report_every > 0.0 && engine.elapsed_days() >= next_report {
            log_stats(&engine);
            next_report += args.report_every;
        }
    }

    let report = RunReport {
        seed: args.seed,
        params: engine.params().fingerprint(),
        width: engine.width(),
        height: engine.height(),
        elapsed_days: engine.elapsed_days(),
        weather_steps: engine.metrics().weather_steps(),
        ecology_steps: engine.metrics().ecology_steps(),
        storms: engine.metrics().storms(),
        dropped_ecology_days: engine.metrics().dropped_days(),
        dropped_weather_days: engine.metrics().dropped_weather_days(),
        wall_seconds: engine.metrics().elapsed().as_secs_f64(),
        weather: *engine.weather(),
        stats: engine.stats(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Log level for repeated `-v` flags, or `None` for the default.
fn verbose_level(count: u8) -> Option<tracing::Level> {
    match count {
        0 => None,
        1 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

fn log_stats(engine: &Engine) {
    let stats = engine.stats();
    tracing::info!(
        day = format!("{:.1}", engine.elapsed_days()),
        avg_toxicity = format!("{:.3}", stats.average_toxicity),
        fungal_cover = format!("{:.2}", stats.total_fungal_cover),
        forest = stats.forest_cells,
        grass = stats.grass_cells,
        mats = stats.fungal_mat_cells,
        barren = stats.barren_cells,
        "Report"
    );
}

fn print_report(report: &RunReport) {
    let s = &report.stats;
    println!(
        "Mycoscape run: {}x{} cells, seed {}",
        report.width, report.height, report.seed
    );
    println!("  parameters    {}", &report.params[..12.min(report.params.len())]);
    println!(
        "  simulated     {:.2} days ({} ecology steps, {} weather steps, {} storms)",
        report.elapsed_days, report.ecology_steps, report.weather_steps, report.storms
    );
    if report.dropped_ecology_days > 0.0 || report.dropped_weather_days > 0.0 {
        println!(
            "  dropped       {:.2} ecology days, {:.2} weather days",
            report.dropped_ecology_days, report.dropped_weather_days
        );
    }
    println!("  wall time     {:.3} s", report.wall_seconds);
    println!(
        "  toxicity      {:.3} avg soil, {:.3} avg air",
        s.average_toxicity, s.average_air_toxicity
    );
    println!("  moisture      {:.3} avg", s.average_moisture);
    println!("  fungal cover  {:.2} total", s.total_fungal_cover);
    println!(
        "  cells         {} forest, {} grass, {} mat, {} barren",
        s.forest_cells, s.grass_cells, s.fungal_mat_cells, s.barren_cells
    );
    println!(
        "  weather       {:.1} °C, {:.0}% humidity, wind {:.1}{}",
        report.weather.temperature,
        report.weather.humidity,
        report.weather.wind_speed,
        if report.weather.storm { ", storm" } else { "" }
    );
}
