//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Engine simulation and alerting primitives."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::registry::EngineRegistry;

/// Number of alerts retained by the dashboard feed.
pub const DEFAULT_ALERT_CAPACITY: usize = 5;

/// Alert urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Pool random alerts draw their severity from.
    pub const ALL: [Severity; 3] = [Severity::Warning, Severity::Critical, Severity::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    /// Font Awesome icon name used by the alert list.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Critical => "exclamation-triangle",
            Severity::Warning => "exclamation-circle",
            Severity::Info => "info-circle",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable alert entry. `engine` names an engine for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub engine: String,
    pub message: String,
    pub severity: Severity,
    pub time: String,
}

/// Newest-first alert list holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    capacity: usize,
    next_id: u64,
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ALERT_CAPACITY)
    }

    /// A zero capacity is raised to one so the newest alert is always visible.
    /// Storage grows with the alerts actually raised, not with the cap.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::new(),
            capacity,
            next_id: 1,
        }
    }

    /// Rebuild a feed from existing alerts listed newest first. Ids issued later
    /// continue after the largest id present.
    pub fn from_alerts<I>(capacity: usize, alerts: I) -> Self
    where
        I: IntoIterator<Item = Alert>,
    {
        let mut feed = Self::with_capacity(capacity);
        for alert in alerts.into_iter().take(feed.capacity) {
            feed.next_id = feed.next_id.max(alert.id.saturating_add(1));
            feed.alerts.push_back(alert);
        }
        feed
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a new alert at the front, evicting the oldest once over capacity.
    /// Returns the id assigned to the alert.
    pub fn raise(
        &mut self,
        engine: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        time: impl Into<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let alert = Alert {
            id,
            engine: engine.into(),
            message: message.into(),
            severity,
            time: time.into(),
        };
        info!(id, engine = %alert.engine, severity = %alert.severity, message = %alert.message, "alert raised");
        self.alerts.push_front(alert);
        while self.alerts.len() > self.capacity {
            if let Some(evicted) = self.alerts.pop_back() {
                debug!(id = evicted.id, "alert evicted by capacity");
            }
        }
        id
    }

    /// Raise an alert for a uniformly chosen engine, message and severity.
    ///
    /// Returns `None` without touching the feed when the registry or either pool is
    /// empty, since there is nothing to choose from.
    pub fn raise_random<R, M>(
        &mut self,
        registry: &EngineRegistry,
        messages: &[M],
        severities: &[Severity],
        time: impl Into<String>,
        rng: &mut R,
    ) -> Option<u64>
    where
        R: Rng + ?Sized,
        M: AsRef<str>,
    {
        if registry.is_empty() {
            return None;
        }
        let engine = registry.name_at(rng.gen_range(0..registry.len()))?.to_owned();
        let message = messages.choose(rng)?.as_ref().to_owned();
        let severity = *severities.choose(rng)?;
        Some(self.raise(engine, message, severity, time))
    }

    /// Remove the alert with `id`. Unknown ids are ignored; returns whether an
    /// alert was removed.
    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.alerts.iter().position(|alert| alert.id == id) {
            Some(index) => {
                self.alerts.remove(index);
                debug!(id, "alert dismissed");
                true
            }
            None => false,
        }
    }

    /// Current alerts, newest first.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Alert> + '_ {
        self.alerts.iter()
    }

    pub fn get(&self, id: u64) -> Option<&Alert> {
        self.alerts.iter().find(|alert| alert.id == id)
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn raise_n(feed: &mut AlertFeed, n: usize) -> Vec<u64> {
        (0..n)
            .map(|i| feed.raise("TF-850", format!("message {i}"), Severity::Info, "12:00"))
            .collect()
    }

    #[test]
    fn sixth_alert_evicts_the_oldest() {
        let mut feed = AlertFeed::new();
        let ids = raise_n(&mut feed, 6);
        assert_eq!(feed.count(), 5);
        let listed: Vec<u64> = feed.list().map(|alert| alert.id).collect();
        let expected: Vec<u64> = ids[1..].iter().rev().copied().collect();
        assert_eq!(listed, expected);
        assert!(feed.get(ids[0]).is_none());
    }

    #[test]
    fn ids_are_unique_across_evictions() {
        let mut feed = AlertFeed::new();
        let mut ids = raise_n(&mut feed, 20);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn dismissing_unknown_id_is_a_no_op() {
        let mut feed = AlertFeed::new();
        raise_n(&mut feed, 2);
        let before = feed.to_vec();
        assert!(!feed.dismiss(999));
        assert_eq!(feed.to_vec(), before);
    }

    #[test]
    fn raise_then_dismiss_round_trips_to_empty() {
        let mut feed = AlertFeed::new();
        let id = feed.raise("GT-9000X", "EGT approaching limit", Severity::Warning, "14:18");
        assert_eq!(feed.count(), 1);
        assert!(feed.dismiss(id));
        assert!(feed.is_empty());
        assert!(!feed.dismiss(id));
    }

    #[test]
    fn seeded_feed_continues_ids() {
        let mut feed = seed::seeded_alerts();
        assert_eq!(feed.count(), 3);
        let first: Vec<u64> = feed.list().map(|alert| alert.id).collect();
        assert_eq!(first, vec![1, 2, 3]);
        let id = feed.raise("TF-850", "Oil temperature warning", Severity::Warning, "15:00");
        assert_eq!(id, 4);
        assert_eq!(feed.list().next().map(|alert| alert.id), Some(4));
    }

    #[test]
    fn raise_random_draws_from_pools() {
        let registry = seed::seeded_registry();
        let mut feed = AlertFeed::new();
        let mut rng = StdRng::seed_from_u64(3);
        let messages = ["Fuel pressure variance", "Vibration anomaly reported"];
        for _ in 0..10 {
            let id = feed
                .raise_random(&registry, &messages, &Severity::ALL, "10:00", &mut rng)
                .expect("alert raised");
            let alert = feed.get(id).unwrap();
            assert!(registry.get(&alert.engine).is_ok());
            assert!(messages.contains(&alert.message.as_str()));
            assert_eq!(alert.time, "10:00");
        }
        assert_eq!(feed.count(), 5);
    }

    #[test]
    fn raise_random_with_empty_pool_leaves_feed_unchanged() {
        let registry = seed::seeded_registry();
        let mut feed = AlertFeed::new();
        let mut rng = StdRng::seed_from_u64(3);
        let empty: [&str; 0] = [];
        assert!(feed
            .raise_random(&registry, &empty, &Severity::ALL, "10:00", &mut rng)
            .is_none());
        assert!(feed.is_empty());
    }

    #[test]
    fn zero_capacity_keeps_latest_alert() {
        let mut feed = AlertFeed::with_capacity(0);
        raise_n(&mut feed, 3);
        assert_eq!(feed.count(), 1);
        assert_eq!(feed.capacity(), 1);
    }

    #[test]
    fn huge_capacity_allocates_on_demand() {
        let mut feed = AlertFeed::with_capacity(1usize << 62);
        let ids = raise_n(&mut feed, 7);
        assert_eq!(feed.capacity(), 1usize << 62);
        assert_eq!(feed.count(), 7);
        assert_eq!(feed.list().next().map(|alert| alert.id), ids.last().copied());
    }

    #[test]
    fn severity_icons() {
        assert_eq!(Severity::Critical.icon(), "exclamation-triangle");
        assert_eq!(Severity::Warning.icon(), "exclamation-circle");
        assert_eq!(Severity::Info.icon(), "info-circle");
    }
}
