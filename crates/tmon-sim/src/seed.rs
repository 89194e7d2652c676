//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Engine simulation and alerting primitives."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
//! Fixed initial state every session starts from.

use crate::alerts::{Alert, AlertFeed, Severity, DEFAULT_ALERT_CAPACITY};
use crate::engine::Engine;
use crate::registry::EngineRegistry;

pub fn seeded_engines() -> Vec<(&'static str, Engine)> {
    vec![
        (
            "TF-850",
            Engine::new(12_450.0, 658.0, 2_840.0, 0.8, 42.0, 33_500.0, 94.2),
        ),
        (
            "GT-9000X",
            Engine::new(11_200.0, 720.0, 3_100.0, 1.2, 38.0, 35_000.0, 91.8),
        ),
        (
            "AE-7500",
            Engine::new(10_800.0, 780.0, 2_950.0, 2.1, 35.0, 32_000.0, 87.5),
        ),
    ]
}

pub fn seeded_registry() -> EngineRegistry {
    EngineRegistry::new(seeded_engines())
}

pub fn seeded_alert_entries() -> Vec<Alert> {
    let alert = |id, engine: &str, message: &str, severity, time: &str| Alert {
        id,
        engine: engine.to_owned(),
        message: message.to_owned(),
        severity,
        time: time.to_owned(),
    };
    vec![
        alert(1, "AE-7500", "High vibration detected", Severity::Critical, "14:23"),
        alert(2, "GT-9000X", "EGT approaching limit", Severity::Warning, "14:18"),
        alert(3, "TF-850", "Scheduled maintenance due", Severity::Info, "13:45"),
    ]
}

pub fn seeded_alerts() -> AlertFeed {
    seeded_alerts_with_capacity(DEFAULT_ALERT_CAPACITY)
}

pub fn seeded_alerts_with_capacity(capacity: usize) -> AlertFeed {
    AlertFeed::from_alerts(capacity, seeded_alert_entries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineStatus;

    #[test]
    fn tf_850_has_exact_seed_values() {
        let registry = seeded_registry();
        let engine = registry.get("TF-850").unwrap();
        assert_eq!(engine.status(), EngineStatus::Normal);
        assert_eq!(engine.rpm(), 12_450.0);
        assert_eq!(engine.egt(), 658.0);
        assert_eq!(engine.fuel_flow(), 2_840.0);
        assert_eq!(engine.vibration(), 0.8);
        assert_eq!(engine.oil_pressure(), 42.0);
        assert_eq!(engine.thrust(), 33_500.0);
        assert_eq!(engine.efficiency(), 94.2);
    }

    #[test]
    fn seeded_statuses_match_thresholds() {
        let registry = seeded_registry();
        assert_eq!(
            registry.get("GT-9000X").unwrap().status(),
            EngineStatus::Warning
        );
        assert_eq!(
            registry.get("AE-7500").unwrap().status(),
            EngineStatus::Critical
        );
    }

    #[test]
    fn small_capacity_truncates_seed_alerts_to_newest() {
        let feed = seeded_alerts_with_capacity(2);
        let ids: Vec<u64> = feed.list().map(|alert| alert.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
