//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Engine simulation and alerting primitives."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("engine '{0}' not found")]
    NotFound(String),
}
