//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Report export for external consumers."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tmon_common::time::report_file_name;
use tmon_sim::{Alert, Engine, MaintenanceSchedule, SimError};
use tracing::info;

use crate::errors::{CoreError, Result};
use crate::views::group_thousands;

/// Snapshot handed to the report generator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub timestamp: DateTime<Utc>,
    pub selected_engine: Option<String>,
    pub engine_data: IndexMap<String, Engine>,
    pub alerts: Vec<Alert>,
    pub maintenance: MaintenanceSchedule,
}

impl DashboardReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        report_file_name(self.timestamp.date_naive())
    }

    /// Write the JSON report into `dir`, creating it when missing.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json_pretty()?)?;
        info!(path = %path.display(), alerts = self.alerts.len(), "dashboard report exported");
        Ok(path)
    }

    /// Plain-text report for the selected engine and the active alerts.
    pub fn render_text(&self) -> Result<String> {
        let name = self
            .selected_engine
            .as_deref()
            .ok_or(CoreError::NoEngineSelected)?;
        let engine = self
            .engine_data
            .get(name)
            .ok_or_else(|| SimError::NotFound(name.to_owned()))?;

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Engine Performance Report");
        let _ = writeln!(out, "Engine: {}", name);
        let _ = writeln!(out, "Generated: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Status: {}", engine.status());
        let _ = writeln!(out);
        let _ = writeln!(out, "RPM: {}", group_thousands(engine.rpm()));
        let _ = writeln!(out, "Exhaust Gas Temperature: {}°C", engine.egt());
        let _ = writeln!(out, "Fuel Flow: {} kg/h", engine.fuel_flow());
        let _ = writeln!(out, "Thrust: {:.1} kN", engine.thrust_kn());
        let _ = writeln!(out);
        let _ = writeln!(out, "Active Alerts");
        if self.alerts.is_empty() {
            let _ = writeln!(out, "No active alerts");
        }
        for alert in &self.alerts {
            let _ = writeln!(
                out,
                "- {}: {} ({} - {})",
                alert.severity, alert.message, alert.engine, alert.time
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DashboardContext;
    use chrono::TimeZone;

    fn report() -> DashboardReport {
        let context = DashboardContext::seeded(10);
        let at = Utc.with_ymd_and_hms(2025, 7, 29, 8, 30, 0).unwrap();
        context.export(at)
    }

    #[test]
    fn json_export_carries_the_full_state() -> Result<()> {
        let json: serde_json::Value = serde_json::from_str(&report().to_json_pretty()?)?;
        assert_eq!(json["selectedEngine"], "TF-850");
        assert_eq!(json["timestamp"], "2025-07-29T08:30:00Z");
        assert_eq!(json["engineData"]["TF-850"]["rpm"], 12_450.0);
        assert_eq!(json["engineData"]["AE-7500"]["status"], "Critical");
        assert_eq!(json["alerts"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["alerts"][0]["severity"], "Critical");
        assert_eq!(json["maintenance"].as_array().map(Vec::len), Some(4));
        Ok(())
    }

    #[test]
    fn writes_dated_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = report().write_to_dir(&dir.path().join("reports"))?;
        assert!(path.ends_with("engine-report-2025-07-29.json"));
        let contents = fs::read_to_string(&path)?;
        assert!(contents.contains("\"engineData\""));
        Ok(())
    }

    #[test]
    fn text_report_lists_headline_metrics_and_alerts() -> Result<()> {
        let text = report().render_text()?;
        assert!(text.contains("Engine: TF-850"));
        assert!(text.contains("Status: Normal"));
        assert!(text.contains("RPM: 12,450"));
        assert!(text.contains("Exhaust Gas Temperature: 658°C"));
        assert!(text.contains("Fuel Flow: 2840 kg/h"));
        assert!(text.contains("Thrust: 33.5 kN"));
        assert!(text.contains("- Critical: High vibration detected (AE-7500 - 14:23)"));
        Ok(())
    }

    #[test]
    fn text_report_requires_a_selection() {
        let mut report = report();
        report.selected_engine = None;
        assert!(matches!(report.render_text(), Err(CoreError::NoEngineSelected)));
        report.selected_engine = Some("missing".into());
        assert!(matches!(
            report.render_text(),
            Err(CoreError::Sim(SimError::NotFound(_)))
        ));
    }
}
