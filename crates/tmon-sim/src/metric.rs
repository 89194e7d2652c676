//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Engine simulation and alerting primitives."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Performance percentage reported for metrics without a known operating range.
pub const NEUTRAL_PERFORMANCE: f64 = 75.0;

/// Closed numeric interval a gauge is kept within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeRange {
    pub min: f64,
    pub max: f64,
}

impl GaugeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` within the range as a percentage, clamped to `[0, 100]`.
    pub fn percentage(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        ((value - self.min) / span * 100.0).clamp(0.0, 100.0)
    }
}

/// Headline metrics shown on status cards and trend charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Rpm,
    Egt,
    FuelFlow,
    Thrust,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Rpm, Metric::Egt, Metric::FuelFlow, Metric::Thrust];

    /// Parse either a card label (`"Fuel Flow"`) or a trend key (`"fuelFlow"`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "RPM" | "rpm" | "Rpm" => Some(Metric::Rpm),
            "EGT" | "egt" | "Egt" => Some(Metric::Egt),
            "Fuel Flow" | "fuelFlow" | "fuel_flow" | "FUELFLOW" => Some(Metric::FuelFlow),
            "Thrust" | "thrust" | "THRUST" => Some(Metric::Thrust),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Rpm => "RPM",
            Metric::Egt => "EGT",
            Metric::FuelFlow => "Fuel Flow",
            Metric::Thrust => "Thrust",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Rpm => "rpm",
            Metric::Egt => "egt",
            Metric::FuelFlow => "fuelFlow",
            Metric::Thrust => "thrust",
        }
    }

    /// Normal operating range used for performance bars. Thrust is in kN.
    pub fn operating_range(&self) -> GaugeRange {
        match self {
            Metric::Rpm => GaugeRange::new(10_000.0, 15_000.0),
            Metric::Egt => GaugeRange::new(600.0, 800.0),
            Metric::FuelFlow => GaugeRange::new(2_500.0, 3_500.0),
            Metric::Thrust => GaugeRange::new(25.0, 40.0),
        }
    }

    pub fn performance(&self, value: f64) -> f64 {
        self.operating_range().percentage(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_label(s).ok_or_else(|| format!("unknown metric: {}", s))
    }
}

/// Performance percentage for a labelled value, or [`NEUTRAL_PERFORMANCE`] when the
/// label has no known operating range.
pub fn normalize(label: &str, value: f64) -> f64 {
    match Metric::from_label(label) {
        Some(metric) => metric.performance(value),
        None => NEUTRAL_PERFORMANCE,
    }
}
