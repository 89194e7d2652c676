//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Periodic simulation loop and lifecycle management."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tmon_rt::Schedule;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::context::DashboardContext;

const EVENT_BUFFER: usize = 64;

/// Context shared between the simulation loop and the presentation layer.
pub type SharedContext = Arc<Mutex<DashboardContext>>;

/// Notification sent after each scheduled job so readers can refresh their views.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Ticked { tick: u64 },
    AlertRaised { id: u64 },
    Clock { at: DateTime<Local> },
}

/// Drives a [`DashboardContext`] from a [`Schedule`].
#[derive(Debug)]
pub struct DashboardRuntime {
    context: SharedContext,
    schedule: Schedule,
}

impl DashboardRuntime {
    pub fn new(context: SharedContext, schedule: Schedule) -> Self {
        Self { context, schedule }
    }

    /// Spawn the simulation loop. All jobs run on a single task so mutations of
    /// the context never interleave.
    pub fn start(self) -> DashboardHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let task = tokio::spawn(run_loop(
            self.context.clone(),
            self.schedule,
            events_tx.clone(),
            shutdown_rx,
        ));
        info!(
            tick_ms = self.schedule.tick.period.as_millis() as u64,
            alert_ms = self.schedule.alert_check.period.as_millis() as u64,
            clock_ms = self.schedule.clock.period.as_millis() as u64,
            "dashboard runtime started"
        );
        DashboardHandle {
            shutdown: shutdown_tx,
            events: events_tx,
            context: self.context,
            task,
        }
    }
}

/// Handle to a running simulation loop.
#[derive(Debug)]
pub struct DashboardHandle {
    shutdown: broadcast::Sender<()>,
    events: broadcast::Sender<DashboardEvent>,
    context: SharedContext,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Cancel every periodic job and wait for the loop to exit. A job already in
    /// progress finishes first.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|err| anyhow::anyhow!("dashboard loop join failure: {}", err))?;
        info!("dashboard runtime stopped");
        Ok(())
    }
}

async fn run_loop(
    context: SharedContext,
    schedule: Schedule,
    events: broadcast::Sender<DashboardEvent>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut tick = schedule.tick.limiter();
    let mut alert_check = schedule.alert_check.limiter();
    let mut clock = schedule.clock.limiter();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                debug!("dashboard loop received shutdown");
                break;
            }
            _ = tick.tick() => {
                let tick = {
                    let mut ctx = context.lock();
                    ctx.tick();
                    ctx.ticks()
                };
                let _ = events.send(DashboardEvent::Ticked { tick });
            }
            _ = alert_check.tick() => {
                let raised = context.lock().alert_check(Local::now());
                if let Some(id) = raised {
                    let _ = events.send(DashboardEvent::AlertRaised { id });
                }
            }
            _ = clock.tick() => {
                let at = Local::now();
                context.lock().refresh_clock(at);
                let _ = events.send(DashboardEvent::Clock { at });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn shared(seed: u64) -> SharedContext {
        Arc::new(Mutex::new(DashboardContext::seeded(seed)))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_the_schedule() -> Result<()> {
        let handle = DashboardRuntime::new(shared(1), Schedule::default()).start();
        tokio::time::sleep(Duration::from_millis(15_500)).await;
        let context = handle.context();
        {
            let ctx = context.lock();
            assert_eq!(ctx.ticks(), 3);
            assert!(ctx.last_refresh().is_some());
        }
        handle.shutdown().await
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_published_per_job() -> Result<()> {
        let handle = DashboardRuntime::new(shared(2), Schedule::default()).start();
        let mut events = handle.subscribe();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        let mut ticks = Vec::new();
        let mut clocks = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                DashboardEvent::Ticked { tick } => ticks.push(tick),
                DashboardEvent::Clock { .. } => clocks += 1,
                DashboardEvent::AlertRaised { .. } => {}
            }
        }
        assert_eq!(ticks, vec![1, 2]);
        assert_eq!(clocks, 10);
        handle.shutdown().await
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_further_ticks() -> Result<()> {
        let handle = DashboardRuntime::new(shared(3), Schedule::default()).start();
        let context = handle.context();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        handle.shutdown().await?;
        let ticks_at_shutdown = context.lock().ticks();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(context.lock().ticks(), ticks_at_shutdown);
        assert_eq!(ticks_at_shutdown, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn alert_checks_raise_with_full_probability() -> Result<()> {
        let mut config = tmon_common::AppConfig::default();
        config.simulation.random_seed = Some(4);
        config.simulation.alert_probability = 1.0;
        let context = Arc::new(Mutex::new(DashboardContext::from_config(&config)));
        let handle = DashboardRuntime::new(context.clone(), Schedule::from_config(&config.simulation)).start();
        tokio::time::sleep(Duration::from_millis(30_500)).await;
        assert_eq!(context.lock().alerts().count(), 5);
        assert_eq!(context.lock().alerts().list().next().map(|alert| alert.id), Some(5));
        handle.shutdown().await
    }
}
