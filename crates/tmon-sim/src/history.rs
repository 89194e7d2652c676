//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Reference data and chart transforms for dashboard views."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use serde::Serialize;

use crate::metric::Metric;

/// One point of the fleet performance history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub time: String,
    pub rpm: f64,
    pub egt: f64,
    pub fuel_flow: f64,
    pub thrust: f64,
}

impl PerformanceSample {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rpm => self.rpm,
            Metric::Egt => self.egt,
            Metric::FuelFlow => self.fuel_flow,
            Metric::Thrust => self.thrust,
        }
    }
}

/// Line-chart series for a single metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceHistory {
    samples: Vec<PerformanceSample>,
}

impl PerformanceHistory {
    pub fn new(samples: Vec<PerformanceSample>) -> Self {
        Self { samples }
    }

    /// Six four-hourly samples of the reference day.
    pub fn seeded() -> Self {
        let sample = |time: &str, rpm, egt, fuel_flow, thrust| PerformanceSample {
            time: time.to_owned(),
            rpm,
            egt,
            fuel_flow,
            thrust,
        };
        Self::new(vec![
            sample("00:00", 12_000.0, 650.0, 2_800.0, 33_000.0),
            sample("04:00", 12_200.0, 655.0, 2_820.0, 33_200.0),
            sample("08:00", 12_400.0, 660.0, 2_850.0, 33_400.0),
            sample("12:00", 12_450.0, 658.0, 2_840.0, 33_500.0),
            sample("16:00", 12_300.0, 665.0, 2_830.0, 33_300.0),
            sample("20:00", 12_100.0, 662.0, 2_810.0, 33_100.0),
        ])
    }

    pub fn samples(&self) -> &[PerformanceSample] {
        &self.samples
    }

    /// Series for `metric`, labelled with the upper-cased metric key.
    pub fn trend(&self, metric: Metric) -> TrendSeries {
        TrendSeries {
            label: metric.key().to_uppercase(),
            color: trend_color(metric),
            labels: self.samples.iter().map(|s| s.time.clone()).collect(),
            values: self.samples.iter().map(|s| s.value(metric)).collect(),
        }
    }
}

pub fn trend_color(metric: Metric) -> &'static str {
    match metric {
        Metric::Rpm => "#3b82f6",
        Metric::Egt => "#ef4444",
        Metric::FuelFlow => "#10b981",
        Metric::Thrust => "#8b5cf6",
    }
}
