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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSegment {
    pub name: String,
    pub value: u32,
    pub color: &'static str,
}

/// Fleet-wide unit counts per condition, drawn as a donut chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetBreakdown {
    segments: Vec<FleetSegment>,
}

impl FleetBreakdown {
    pub fn new(segments: Vec<FleetSegment>) -> Self {
        Self { segments }
    }

    pub fn seeded() -> Self {
        let segment = |name: &str, value, color| FleetSegment {
            name: name.to_owned(),
            value,
            color,
        };
        Self::new(vec![
            segment("Normal", 15, "#10b981"),
            segment("Warning", 3, "#f59e0b"),
            segment("Critical", 1, "#ef4444"),
            segment("Maintenance", 2, "#6b7280"),
        ])
    }

    pub fn segments(&self) -> &[FleetSegment] {
        &self.segments
    }

    pub fn total(&self) -> u32 {
        self.segments.iter().map(|segment| segment.value).sum()
    }

    /// Each segment with its fraction of the fleet; empty fleets report zero.
    pub fn shares(&self) -> Vec<(&FleetSegment, f64)> {
        let total = f64::from(self.total());
        self.segments
            .iter()
            .map(|segment| {
                let share = if total > 0.0 {
                    f64::from(segment.value) / total
                } else {
                    0.0
                };
                (segment, share)
            })
            .collect()
    }
}
