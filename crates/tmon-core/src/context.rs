//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Dashboard context and lifecycle management."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use chrono::{DateTime, Local, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tmon_common::config::AppConfig;
use tmon_common::time::alert_time;
use tmon_metrics::DashboardMetrics;
use tmon_sim::{
    seed, AlertFeed, Engine, EngineRegistry, EngineStatus, FleetBreakdown, MaintenanceSchedule,
    PerformanceHistory, Severity,
};
use tracing::{debug, info};

use crate::report::DashboardReport;

/// Everything one dashboard session owns: the engine registry, the alert feed,
/// static reference data, and the random source driving the simulation.
///
/// Built fresh at session start; the scheduler and presentation layer both act
/// on it through explicit method calls.
#[derive(Debug)]
pub struct DashboardContext {
    registry: EngineRegistry,
    alerts: AlertFeed,
    history: PerformanceHistory,
    fleet: FleetBreakdown,
    maintenance: MaintenanceSchedule,
    messages: Vec<String>,
    alert_probability: f64,
    rng: StdRng,
    ticks: u64,
    last_refresh: Option<DateTime<Local>>,
    metrics: Option<DashboardMetrics>,
}

impl DashboardContext {
    /// Seeded session using the configured alert pool, capacity and probability.
    /// Without a configured seed the generator is seeded from OS entropy.
    pub fn from_config(config: &AppConfig) -> Self {
        let rng = match config.simulation.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let context = Self {
            registry: seed::seeded_registry(),
            alerts: seed::seeded_alerts_with_capacity(config.alerts.capacity),
            history: PerformanceHistory::seeded(),
            fleet: FleetBreakdown::seeded(),
            maintenance: MaintenanceSchedule::seeded(),
            messages: config.alerts.messages.clone(),
            alert_probability: alert_probability(config.simulation.alert_probability),
            rng,
            ticks: 0,
            last_refresh: None,
            metrics: None,
        };
        info!(
            engines = context.registry.len(),
            alerts = context.alerts.count(),
            seeded = config.simulation.random_seed.is_some(),
            "dashboard context initialised"
        );
        context
    }

    /// Default session with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        let mut config = AppConfig::default();
        config.simulation.random_seed = Some(seed);
        Self::from_config(&config)
    }

    /// Attach instruments and publish the current state to them.
    pub fn with_metrics(mut self, metrics: DashboardMetrics) -> Self {
        self.metrics = Some(metrics);
        self.publish_engine_metrics();
        self.publish_alert_metrics();
        self
    }

    /// Apply one simulation step to every engine.
    pub fn tick(&mut self) {
        self.registry.tick(&mut self.rng);
        self.ticks += 1;
        if let Some(metrics) = &self.metrics {
            metrics.inc_tick();
        }
        self.publish_engine_metrics();
        debug!(tick = self.ticks, "simulation tick applied");
    }

    /// Periodic alert check: raises a random alert with the configured probability.
    pub fn alert_check(&mut self, now: DateTime<Local>) -> Option<u64> {
        if self.rng.gen_bool(self.alert_probability) {
            self.raise_random_alert(now)
        } else {
            None
        }
    }

    pub fn raise_random_alert(&mut self, now: DateTime<Local>) -> Option<u64> {
        let id = self.alerts.raise_random(
            &self.registry,
            &self.messages,
            &Severity::ALL,
            alert_time(&now),
            &mut self.rng,
        )?;
        self.record_raised();
        Some(id)
    }

    pub fn raise_alert(
        &mut self,
        engine: &str,
        message: &str,
        severity: Severity,
        now: DateTime<Local>,
    ) -> u64 {
        let id = self
            .alerts
            .raise(engine, message, severity, alert_time(&now));
        self.record_raised();
        id
    }

    /// Remove an alert; unknown ids are ignored.
    pub fn dismiss_alert(&mut self, id: u64) -> bool {
        let removed = self.alerts.dismiss(id);
        if removed {
            if let Some(metrics) = &self.metrics {
                metrics.inc_alert_dismissed();
            }
            self.publish_alert_metrics();
        }
        removed
    }

    pub fn select_engine(&mut self, name: &str) -> tmon_sim::Result<()> {
        self.registry.select(name)?;
        debug!(engine = name, "engine selected");
        Ok(())
    }

    pub fn refresh_clock(&mut self, now: DateTime<Local>) {
        self.last_refresh = Some(now);
    }

    pub fn engine(&self, name: &str) -> tmon_sim::Result<&Engine> {
        self.registry.get(name)
    }

    pub fn normalized_metric(&self, name: &str, metric: &str) -> tmon_sim::Result<f64> {
        self.registry.normalized_metric(name, metric)
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn alerts(&self) -> &AlertFeed {
        &self.alerts
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    pub fn fleet(&self) -> &FleetBreakdown {
        &self.fleet
    }

    pub fn maintenance(&self) -> &MaintenanceSchedule {
        &self.maintenance
    }

    pub fn selected(&self) -> Option<&str> {
        self.registry.selected()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    /// Serializable snapshot for the report generator.
    pub fn export(&self, timestamp: DateTime<Utc>) -> DashboardReport {
        DashboardReport {
            timestamp,
            selected_engine: self.registry.selected().map(str::to_owned),
            engine_data: self.registry.engines().clone(),
            alerts: self.alerts.to_vec(),
            maintenance: self.maintenance.clone(),
        }
    }

    fn record_raised(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_alert_raised();
        }
        self.publish_alert_metrics();
    }

    fn publish_engine_metrics(&self) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        let statuses = EngineStatus::ALL.map(|status| status.as_str());
        for (name, engine) in self.registry.iter() {
            metrics.set_engine_status(name, engine.status().as_str(), &statuses);
        }
    }

    fn publish_alert_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.set_alerts_active(self.alerts.count());
        }
    }
}

/// Clamp to a valid Bernoulli probability; NaN disables random alerts.
fn alert_probability(configured: f64) -> f64 {
    if configured.is_nan() {
        0.0
    } else {
        configured.clamp(0.0, 1.0)
    }
}
