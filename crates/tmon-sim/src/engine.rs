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

use serde::{Deserialize, Serialize};

use crate::metric::{GaugeRange, Metric};

pub const RPM_RANGE: GaugeRange = GaugeRange::new(10_000.0, 15_000.0);
pub const EGT_RANGE: GaugeRange = GaugeRange::new(600.0, 850.0);
pub const FUEL_FLOW_RANGE: GaugeRange = GaugeRange::new(2_500.0, 3_500.0);
pub const VIBRATION_RANGE: GaugeRange = GaugeRange::new(0.1, 3.0);
pub const OIL_PRESSURE_RANGE: GaugeRange = GaugeRange::new(25.0, 50.0);

const EGT_CRITICAL: f64 = 750.0;
const EGT_WARNING: f64 = 700.0;
const VIBRATION_CRITICAL: f64 = 1.5;
const VIBRATION_WARNING: f64 = 1.0;

/// Health classification derived from exhaust gas temperature and vibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum EngineStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl EngineStatus {
    pub const ALL: [EngineStatus; 3] = [
        EngineStatus::Normal,
        EngineStatus::Warning,
        EngineStatus::Critical,
    ];

    /// Critical wins over Warning; both thresholds are strict.
    pub fn classify(egt: f64, vibration: f64) -> Self {
        if egt > EGT_CRITICAL || vibration > VIBRATION_CRITICAL {
            EngineStatus::Critical
        } else if egt > EGT_WARNING || vibration > VIBRATION_WARNING {
            EngineStatus::Warning
        } else {
            EngineStatus::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Normal => "Normal",
            EngineStatus::Warning => "Warning",
            EngineStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Increments applied to the mutable gauges during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaugeDeltas {
    pub rpm: f64,
    pub egt: f64,
    pub fuel_flow: f64,
    pub vibration: f64,
    pub oil_pressure: f64,
}

/// Current metrics for one monitored engine.
///
/// `status` is recomputed whenever gauges change and cannot be set by callers.
/// Thrust (newtons) and efficiency (percent) are seeded once and stay static.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    status: EngineStatus,
    rpm: f64,
    egt: f64,
    fuel_flow: f64,
    vibration: f64,
    oil_pressure: f64,
    thrust: f64,
    efficiency: f64,
}

impl Engine {
    /// Build an engine from raw gauge readings. Mutable gauges are clamped to their
    /// ranges and the status is derived.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rpm: f64,
        egt: f64,
        fuel_flow: f64,
        vibration: f64,
        oil_pressure: f64,
        thrust: f64,
        efficiency: f64,
    ) -> Self {
        let mut engine = Self {
            status: EngineStatus::Normal,
            rpm,
            egt,
            fuel_flow,
            vibration,
            oil_pressure,
            thrust,
            efficiency,
        };
        engine.apply(GaugeDeltas::default());
        engine
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    pub fn egt(&self) -> f64 {
        self.egt
    }

    pub fn fuel_flow(&self) -> f64 {
        self.fuel_flow
    }

    pub fn vibration(&self) -> f64 {
        self.vibration
    }

    pub fn oil_pressure(&self) -> f64 {
        self.oil_pressure
    }

    /// Thrust in newtons.
    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    pub fn thrust_kn(&self) -> f64 {
        self.thrust / 1_000.0
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Value of a headline metric in the units its operating range uses.
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rpm => self.rpm,
            Metric::Egt => self.egt,
            Metric::FuelFlow => self.fuel_flow,
            Metric::Thrust => self.thrust_kn(),
        }
    }

    /// Add deltas, clamp every mutable gauge, then re-derive the status.
    pub fn apply(&mut self, deltas: GaugeDeltas) {
        self.rpm = RPM_RANGE.clamp(self.rpm + deltas.rpm);
        self.egt = EGT_RANGE.clamp(self.egt + deltas.egt);
        self.fuel_flow = FUEL_FLOW_RANGE.clamp(self.fuel_flow + deltas.fuel_flow);
        self.vibration = VIBRATION_RANGE.clamp(self.vibration + deltas.vibration);
        self.oil_pressure = OIL_PRESSURE_RANGE.clamp(self.oil_pressure + deltas.oil_pressure);
        self.status = EngineStatus::classify(self.egt, self.vibration);
    }
}
