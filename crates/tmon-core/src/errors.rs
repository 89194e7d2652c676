//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Dashboard context and lifecycle management."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use thiserror::Error;
use tmon_sim::SimError;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("no engine is selected")]
    NoEngineSelected,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
