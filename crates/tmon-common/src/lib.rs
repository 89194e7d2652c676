//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Shared primitives and utilities for the monitor runtime."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
//! Shared primitives for the turbine monitor workspace.
//! This crate exposes configuration loading, tracing setup, and the clock
//! formatting helpers consumed by the simulation and daemon crates.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    AlertsConfig, AppConfig, LoadedAppConfig, LoggingConfig, MetricsConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat, LoggingGuard};
