//! ---
//! tmon_section: "03-observability"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Metrics collection and export utilities."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, StatusCode};
use axum::routing::get;
use axum::{response::IntoResponse, Router};
use prometheus::{IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Shared registry type used across crates.
pub type SharedRegistry = Arc<Registry>;

/// Produce a new shared registry.
pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

/// Spawn an HTTP server that exposes the registry at `/metrics`.
pub fn spawn_http_server(registry: SharedRegistry, addr: SocketAddr) -> Result<MetricsServer> {
    let app = Router::new().route(
        "/metrics",
        get({
            let registry = registry.clone();
            move || metrics_handler(registry.clone())
        }),
    );

    let std_listener = StdTcpListener::bind(addr)
        .with_context(|| format!("failed to bind metrics listener {}", addr))?;
    std_listener
        .set_nonblocking(true)
        .with_context(|| "failed to configure metrics listener as non-blocking")?;
    let local_addr = std_listener.local_addr().unwrap_or(addr);
    let listener = TcpListener::from_std(std_listener)
        .with_context(|| "failed to convert std listener into tokio listener")?;

    info!(address = %local_addr, "metrics server starting");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let service = app.into_make_service();
    let handle: JoinHandle<Result<()>> = tokio::spawn(async move {
        axum::serve(listener, service)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .context("metrics server encountered an error")?;
        Ok(())
    });

    Ok(MetricsServer {
        addr: local_addr,
        shutdown: Some(shutdown_tx),
        task: handle,
    })
}

async fn metrics_handler(registry: SharedRegistry) -> impl IntoResponse {
    match encode(&registry) {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            body,
        ),
        Err(err) => {
            error!(error = %err, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))],
                String::from("metrics encoding error"),
            )
        }
    }
}

/// Render the registry in the Prometheus text exposition format.
pub fn encode(registry: &Registry) -> Result<String> {
    let families = registry.gather();
    TextEncoder::new()
        .encode_to_string(&families)
        .context("failed to encode metric families")
}

/// Handle to the running HTTP exporter.
#[derive(Debug)]
pub struct MetricsServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl MetricsServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal shutdown and await task completion.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err),
            Err(join_err) => Err(anyhow::Error::new(join_err)),
        }
    }
}

/// Instruments updated by the simulation loop and alert commands.
#[derive(Clone, Debug)]
pub struct DashboardMetrics {
    ticks_total: IntCounter,
    alerts_raised_total: IntCounter,
    alerts_dismissed_total: IntCounter,
    alerts_active: IntGauge,
    engine_status: IntGaugeVec,
}

impl DashboardMetrics {
    /// Create the instruments and register them with `registry`.
    pub fn new(registry: SharedRegistry) -> Result<Self> {
        let ticks_total = IntCounter::with_opts(Opts::new(
            "tmon_ticks_total",
            "Simulation ticks applied to the engine registry",
        ))?;
        registry.register(Box::new(ticks_total.clone()))?;

        let alerts_raised_total = IntCounter::with_opts(Opts::new(
            "tmon_alerts_raised_total",
            "Alerts inserted into the feed",
        ))?;
        registry.register(Box::new(alerts_raised_total.clone()))?;

        let alerts_dismissed_total = IntCounter::with_opts(Opts::new(
            "tmon_alerts_dismissed_total",
            "Alerts removed by explicit dismissal",
        ))?;
        registry.register(Box::new(alerts_dismissed_total.clone()))?;

        let alerts_active = IntGauge::with_opts(Opts::new(
            "tmon_alerts_active",
            "Alerts currently held by the feed",
        ))?;
        registry.register(Box::new(alerts_active.clone()))?;

        let engine_status = IntGaugeVec::new(
            Opts::new(
                "tmon_engine_status",
                "One for the status each engine is currently in, zero otherwise",
            ),
            &["engine", "status"],
        )?;
        registry.register(Box::new(engine_status.clone()))?;

        Ok(Self {
            ticks_total,
            alerts_raised_total,
            alerts_dismissed_total,
            alerts_active,
            engine_status,
        })
    }

    pub fn inc_tick(&self) {
        self.ticks_total.inc();
    }

    pub fn inc_alert_raised(&self) {
        self.alerts_raised_total.inc();
    }

    pub fn inc_alert_dismissed(&self) {
        self.alerts_dismissed_total.inc();
    }

    pub fn set_alerts_active(&self, count: usize) {
        self.alerts_active
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Mark `current` as the engine's status among all known `statuses`.
    pub fn set_engine_status(&self, engine: &str, current: &str, statuses: &[&str]) {
        for status in statuses {
            let value = i64::from(*status == current);
            self.engine_status
                .with_label_values(&[engine, *status])
                .set(value);
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks_total.get()
    }
}
