//! ---
//! tmon_section: "15-testing-qa-runbook"
//! tmon_subsection: "integration-tests"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "End-to-end runs of the dashboard runtime with metrics and export."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tmon_common::config::AppConfig;
use tmon_core::{DashboardContext, DashboardEvent, DashboardRuntime};
use tmon_metrics::{encode, new_registry, DashboardMetrics};
use tmon_rt::Schedule;
use tmon_sim::engine::{EGT_RANGE, RPM_RANGE, VIBRATION_RANGE};
use tmon_sim::EngineStatus;

fn seeded_config(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation.random_seed = Some(seed);
    config
}

#[tokio::test(start_paused = true)]
async fn runtime_publishes_metrics_while_ticking() -> Result<()> {
    let config = seeded_config(21);
    let registry = new_registry();
    let context = DashboardContext::from_config(&config)
        .with_metrics(DashboardMetrics::new(registry.clone())?);
    let shared = Arc::new(Mutex::new(context));
    let handle =
        DashboardRuntime::new(shared.clone(), Schedule::from_config(&config.simulation)).start();

    tokio::time::sleep(Duration::from_millis(15_500)).await;
    handle.shutdown().await?;

    let text = encode(&registry)?;
    assert!(text.contains("tmon_ticks_total 3"), "{text}");
    let active = shared.lock().alerts().count();
    assert!(text.contains(&format!("tmon_alerts_active {active}")), "{text}");
    for (name, engine) in shared.lock().registry().iter() {
        let line = format!(
            "tmon_engine_status{{engine=\"{}\",status=\"{}\"}} 1",
            name,
            engine.status()
        );
        assert!(text.contains(&line), "missing {line}");
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_raised_alerts() -> Result<()> {
    let mut config = seeded_config(22);
    config.simulation.alert_probability = 1.0;
    let shared = Arc::new(Mutex::new(DashboardContext::from_config(&config)));
    let handle =
        DashboardRuntime::new(shared.clone(), Schedule::from_config(&config.simulation)).start();
    let mut events = handle.subscribe();

    tokio::time::sleep(Duration::from_millis(15_500)).await;
    let mut raised = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let DashboardEvent::AlertRaised { id } = event {
            raised.push(id);
        }
    }
    handle.shutdown().await?;

    assert_eq!(raised, vec![4]);
    let ctx = shared.lock();
    let newest = ctx.alerts().list().next().expect("feed holds the new alert");
    assert_eq!(newest.id, 4);
    assert!(config.alerts.messages.contains(&newest.message));
    assert!(ctx.registry().get(&newest.engine).is_ok());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn export_after_a_run_reflects_live_state() -> Result<()> {
    let config = seeded_config(23);
    let shared = Arc::new(Mutex::new(DashboardContext::from_config(&config)));
    let handle =
        DashboardRuntime::new(shared.clone(), Schedule::from_config(&config.simulation)).start();
    tokio::time::sleep(Duration::from_millis(50_500)).await;
    handle.shutdown().await?;

    let dir = tempfile::tempdir()?;
    let at = Utc.with_ymd_and_hms(2025, 7, 30, 12, 0, 0).unwrap();
    let path = shared.lock().export(at).write_to_dir(dir.path())?;
    assert!(path.ends_with("engine-report-2025-07-30.json"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let engines = json["engineData"].as_object().expect("engine map");
    assert_eq!(engines.len(), 3);
    for engine in engines.values() {
        let rpm = engine["rpm"].as_f64().expect("rpm");
        let egt = engine["egt"].as_f64().expect("egt");
        let vibration = engine["vibration"].as_f64().expect("vibration");
        assert!(RPM_RANGE.contains(rpm));
        assert!(EGT_RANGE.contains(egt));
        assert!(VIBRATION_RANGE.contains(vibration));
        let status = EngineStatus::classify(egt, vibration);
        assert_eq!(engine["status"], status.as_str());
    }
    assert!(json["alerts"].as_array().map(Vec::len).unwrap_or_default() <= 5);
    Ok(())
}
