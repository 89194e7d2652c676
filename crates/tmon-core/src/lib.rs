//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Dashboard context and lifecycle management."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
//! Dashboard session context, the periodic simulation runtime, and report export.

pub mod context;
pub mod errors;
pub mod report;
pub mod runtime;
pub mod views;

pub use context::DashboardContext;
pub use errors::{CoreError, Result};
pub use report::DashboardReport;
pub use runtime::{DashboardEvent, DashboardHandle, DashboardRuntime, SharedContext};
pub use views::{EngineListEntry, ParameterBar, StatusCard};
