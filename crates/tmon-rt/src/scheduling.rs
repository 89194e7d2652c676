//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Runtime helpers supporting the simulation loop."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::time::Duration;

use tmon_common::config::SimulationConfig;
use tokio::time::{Instant, MissedTickBehavior};

/// Shortest period a limiter will run at; tokio rejects a zero period.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Async rate limiter that ensures deterministic loop intervals.
///
/// The first tick completes one full period after creation, matching a repeating
/// timer rather than an immediate call. Periods below [`MIN_PERIOD`] are raised to it.
#[derive(Debug)]
pub struct RateLimiter {
    interval: tokio::time::Interval,
}

impl RateLimiter {
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

/// A named job invoked on a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    pub name: &'static str,
    pub period: Duration,
}

impl PeriodicTask {
    pub const fn new(name: &'static str, period: Duration) -> Self {
        Self { name, period }
    }

    pub fn limiter(&self) -> RateLimiter {
        RateLimiter::new(self.period)
    }
}

/// Periods of the three jobs that drive the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub tick: PeriodicTask,
    pub alert_check: PeriodicTask,
    pub clock: PeriodicTask,
}

impl Schedule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            tick: PeriodicTask::new("tick", config.tick_interval),
            alert_check: PeriodicTask::new("alert-check", config.alert_interval),
            clock: PeriodicTask::new("clock", config.clock_interval),
        }
    }

    pub fn tasks(&self) -> [PeriodicTask; 3] {
        [self.tick, self.alert_check, self.clock]
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_matches_dashboard() {
        let schedule = Schedule::default();
        assert_eq!(schedule.tick.period, Duration::from_secs(5));
        assert_eq!(schedule.alert_check.period, Duration::from_secs(15));
        assert_eq!(schedule.clock.period, Duration::from_secs(1));
        let names: Vec<&str> = schedule.tasks().iter().map(|task| task.name).collect();
        assert_eq!(names, vec!["tick", "alert-check", "clock"]);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let fired = limiter.tick().await;
        assert_eq!(fired - start, Duration::from_secs(5));
        let fired = limiter.tick().await;
        assert_eq!(fired - start, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_config_runs_at_minimum_period() {
        let config = SimulationConfig {
            tick_interval: Duration::ZERO,
            ..SimulationConfig::default()
        };
        let schedule = Schedule::from_config(&config);
        let start = Instant::now();
        let mut limiter = schedule.tick.limiter();
        assert_eq!(limiter.period(), MIN_PERIOD);
        let fired = limiter.tick().await;
        assert_eq!(fired - start, MIN_PERIOD);
    }
}
