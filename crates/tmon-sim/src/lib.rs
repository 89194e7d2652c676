//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "01-bootstrap"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Simulation module exports and shared types."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
//! Engine telemetry simulation and alerting core for the turbine monitor.
//!
//! [`EngineRegistry`] evolves engine gauges one tick at a time and derives each
//! engine's status; [`AlertFeed`] keeps a bounded, newest-first alert list. Both
//! take their randomness as a parameter so runs can be replayed from a seed.

pub mod alerts;
pub mod engine;
pub mod errors;
pub mod fleet;
pub mod history;
pub mod maintenance;
pub mod metric;
pub mod registry;
pub mod seed;

pub use alerts::{Alert, AlertFeed, Severity, DEFAULT_ALERT_CAPACITY};
pub use engine::{Engine, EngineStatus, GaugeDeltas};
pub use errors::{Result, SimError};
pub use fleet::{FleetBreakdown, FleetSegment};
pub use history::{PerformanceHistory, PerformanceSample, TrendSeries};
pub use maintenance::{DueState, MaintenanceSchedule, MaintenanceTask, Priority};
pub use metric::{normalize, GaugeRange, Metric, NEUTRAL_PERFORMANCE};
pub use registry::EngineRegistry;
