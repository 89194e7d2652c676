//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "binary"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Binary entrypoint for the turbine monitor daemon."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use tmon_common::config::{AppConfig, SimulationConfig};
use tmon_common::logging::init_tracing;
use tmon_common::time::clock_display;
use tmon_core::views::{engine_list, parameter_bars, status_cards};
use tmon_core::{DashboardContext, DashboardEvent, DashboardRuntime};
use tmon_metrics::{new_registry, spawn_http_server, DashboardMetrics};
use tmon_rt::Schedule;
use tmon_sim::{DueState, Metric};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Turbine engine telemetry monitor",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Seed the simulation for a reproducible run")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the live simulation until interrupted")]
    Run {
        #[arg(long, help = "Stop after this many ticks")]
        max_ticks: Option<u64>,
    },
    #[command(about = "Print engine status after an offline simulation")]
    Status {
        #[arg(long, default_value_t = 0, help = "Ticks to simulate before printing")]
        ticks: u64,
        #[arg(long, help = "Engine to show status cards for")]
        engine: Option<String>,
        #[arg(long, help = "Print the engine list as JSON")]
        json: bool,
    },
    #[command(about = "Write the JSON dashboard report")]
    Export {
        #[arg(long, default_value_t = 0, help = "Ticks to simulate before exporting")]
        ticks: u64,
        #[arg(long, value_name = "DIR", default_value = "target/reports")]
        out: PathBuf,
    },
    #[command(about = "Print the plain-text engine report")]
    Report {
        #[arg(long, default_value_t = 0, help = "Ticks to simulate before reporting")]
        ticks: u64,
        #[arg(long, help = "Engine to report on instead of the selected one")]
        engine: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/tmon.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(seed) = cli.seed {
        config.simulation.random_seed = Some(seed);
    }
    let _log_guard = init_tracing("tmond", &config.logging)?;
    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found; running with defaults"),
    }

    match cli.command.unwrap_or(Commands::Run { max_ticks: None }) {
        Commands::Run { max_ticks } => run_daemon(config, max_ticks).await?,
        Commands::Status {
            ticks,
            engine,
            json,
        } => {
            let mut context = DashboardContext::from_config(&config);
            simulate_offline(&mut context, &config.simulation, ticks);
            if let Some(name) = engine {
                context.select_engine(&name)?;
            }
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&engine_list(context.registry()))?
                );
            } else {
                print_status(&context)?;
            }
        }
        Commands::Export { ticks, out } => {
            let mut context = DashboardContext::from_config(&config);
            simulate_offline(&mut context, &config.simulation, ticks);
            let path = context
                .export(Utc::now())
                .write_to_dir(&out)
                .with_context(|| format!("failed to export report into {}", out.display()))?;
            println!("{}", path.display());
        }
        Commands::Report { ticks, engine } => {
            let mut context = DashboardContext::from_config(&config);
            simulate_offline(&mut context, &config.simulation, ticks);
            if let Some(name) = engine {
                context.select_engine(&name)?;
            }
            print!("{}", context.export(Utc::now()).render_text()?);
        }
    }

    Ok(())
}

async fn run_daemon(config: AppConfig, max_ticks: Option<u64>) -> Result<()> {
    let mut context = DashboardContext::from_config(&config);
    let mut metrics_server = None;
    if config.metrics.enabled {
        let registry = new_registry();
        context = context.with_metrics(DashboardMetrics::new(registry.clone())?);
        metrics_server = Some(spawn_http_server(registry, config.metrics.listen)?);
    } else {
        info!("metrics exporter disabled by configuration");
    }

    let shared = Arc::new(Mutex::new(context));
    let handle =
        DashboardRuntime::new(shared.clone(), Schedule::from_config(&config.simulation)).start();
    let mut events = handle.subscribe();

    info!("simulation running; waiting for termination signal");
    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("ctrl-c received; shutting down");
                break;
            }
            event = events.recv() => match event {
                Ok(DashboardEvent::Ticked { tick }) => {
                    log_fleet(&shared.lock());
                    if max_ticks.is_some_and(|max| tick >= max) {
                        info!(tick, "tick limit reached; shutting down");
                        break;
                    }
                }
                Ok(DashboardEvent::AlertRaised { id }) => {
                    let ctx = shared.lock();
                    if let Some(alert) = ctx.alerts().get(id) {
                        println!(
                            "[{}] {} {} {}: {}",
                            alert.time,
                            alert.severity.icon(),
                            alert.severity,
                            alert.engine,
                            alert.message
                        );
                    }
                }
                Ok(DashboardEvent::Clock { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "presentation fell behind the simulation loop");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.shutdown().await?;
    if let Some(server) = metrics_server {
        server.shutdown().await?;
    }
    Ok(())
}

/// Replay the schedule without waiting: one alert check per alert interval's
/// worth of ticks.
fn simulate_offline(context: &mut DashboardContext, simulation: &SimulationConfig, ticks: u64) {
    let ticks_per_check = (simulation.alert_interval.as_millis()
        / simulation.tick_interval.as_millis().max(1))
    .max(1) as u64;
    for tick in 1..=ticks {
        context.tick();
        if tick % ticks_per_check == 0 {
            context.alert_check(Local::now());
        }
    }
}

fn log_fleet(context: &DashboardContext) {
    for entry in engine_list(context.registry()) {
        if let Ok(engine) = context.engine(&entry.name) {
            info!(
                tick = context.ticks(),
                engine = %entry.name,
                status = %entry.status,
                rpm = engine.rpm(),
                egt = engine.egt(),
                vibration = engine.vibration(),
                "engine telemetry"
            );
        }
    }
}

fn print_status(context: &DashboardContext) -> Result<()> {
    let (date, time) = clock_display(&Local::now());
    println!("{} {}  (ticks: {})", date, time, context.ticks());
    for entry in engine_list(context.registry()) {
        let marker = if entry.selected { "*" } else { " " };
        println!("{} {:<10} {}", marker, entry.name, entry.status);
    }
    if let Some(name) = context.selected() {
        let engine = context.engine(name)?;
        println!();
        for card in status_cards(engine) {
            println!(
                "{:<10} {:>8}{:<5} {:>5.1}%",
                card.metric.label(),
                card.value,
                card.unit,
                card.performance
            );
        }
        for bar in parameter_bars(engine) {
            println!("param {:<12} {:>8.1}", bar.label, bar.value);
        }
        let today = Local::now().date_naive();
        for task in context.maintenance().for_engine(name) {
            let state = match task.due_state(today) {
                DueState::Overdue => "overdue",
                DueState::Soon => "due soon",
                DueState::Scheduled => "scheduled",
            };
            println!("maintenance: {} on {} ({:?}, {})", task.task, task.due, task.priority, state);
        }
    }
    println!();
    for (segment, share) in context.fleet().shares() {
        println!("fleet {:<12} {:>3} ({:.0}%)", segment.name, segment.value, share * 100.0);
    }
    println!();
    for metric in Metric::ALL {
        let series = context.history().trend(metric);
        let points: Vec<String> = series
            .labels
            .iter()
            .zip(&series.values)
            .map(|(at, value)| format!("{} {}", at, value))
            .collect();
        println!("trend {:<9} {}", series.label, points.join(" | "));
    }
    println!();
    println!("Alerts ({})", context.alerts().count());
    for alert in context.alerts().list() {
        println!(
            "#{:<4} {:<8} {:<9} {} ({})",
            alert.id, alert.severity, alert.engine, alert.message, alert.time
        );
    }
    Ok(())
}
