//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Runtime helpers supporting the simulation loop."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
//! Periodic scheduling helpers for the turbine monitor runtime.

pub mod scheduling;

pub use scheduling::{PeriodicTask, RateLimiter, Schedule};
