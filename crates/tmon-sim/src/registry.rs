//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Engine simulation and alerting primitives."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use indexmap::IndexMap;
use rand::Rng;
use tracing::{debug, warn};

use crate::engine::{Engine, EngineStatus, GaugeDeltas};
use crate::errors::{Result, SimError};
use crate::metric::{Metric, NEUTRAL_PERFORMANCE};

impl GaugeDeltas {
    /// Draw one tick worth of noise. Integer gauges move by whole units in
    /// `[-k, k)`, vibration drifts continuously within `[-0.1, 0.1)`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            rpm: f64::from(rng.gen_range(-10i32..10)),
            egt: f64::from(rng.gen_range(-3i32..3)),
            fuel_flow: f64::from(rng.gen_range(-10i32..10)),
            vibration: rng.gen_range(-0.1..0.1),
            oil_pressure: f64::from(rng.gen_range(-2i32..2)),
        }
    }
}

/// Authoritative set of monitored engines keyed by tag.
///
/// Iteration follows registration order so seeded runs stay reproducible.
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: IndexMap<String, Engine>,
    selected: Option<String>,
}

impl EngineRegistry {
    /// Build a registry from `(tag, engine)` pairs; the first engine starts selected.
    pub fn new<I, S>(engines: I) -> Self
    where
        I: IntoIterator<Item = (S, Engine)>,
        S: Into<String>,
    {
        let engines: IndexMap<String, Engine> = engines
            .into_iter()
            .map(|(name, engine)| (name.into(), engine))
            .collect();
        let selected = engines.keys().next().cloned();
        Self { engines, selected }
    }

    /// Apply one simulation step to every engine.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (name, engine) in self.engines.iter_mut() {
            let previous = engine.status();
            engine.apply(GaugeDeltas::sample(rng));
            let current = engine.status();
            if current != previous {
                if current == EngineStatus::Critical {
                    warn!(engine = %name, egt = engine.egt(), vibration = engine.vibration(), "engine entered critical state");
                } else {
                    debug!(engine = %name, from = %previous, to = %current, "engine status changed");
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&Engine> {
        self.engines
            .get(name)
            .ok_or_else(|| SimError::NotFound(name.to_owned()))
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.engines.contains_key(name) {
            return Err(SimError::NotFound(name.to_owned()));
        }
        self.selected = Some(name.to_owned());
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Performance percentage of `metric` for the named engine. Labels without a
    /// known operating range yield [`NEUTRAL_PERFORMANCE`].
    pub fn normalized_metric(&self, name: &str, metric: &str) -> Result<f64> {
        let engine = self.get(name)?;
        Ok(match Metric::from_label(metric) {
            Some(metric) => metric.performance(engine.metric_value(metric)),
            None => NEUTRAL_PERFORMANCE,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.engines.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Engine)> + '_ {
        self.engines.iter().map(|(name, engine)| (name.as_str(), engine))
    }

    pub fn engines(&self) -> &IndexMap<String, Engine> {
        &self.engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Engine tag at `index` in registration order.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.engines.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Number of engines currently in `status`.
    pub fn count_with_status(&self, status: EngineStatus) -> usize {
        self.engines
            .values()
            .filter(|engine| engine.status() == status)
            .count()
    }
}
