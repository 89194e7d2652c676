//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Read-only view models for the presentation layer."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use serde::Serialize;
use tmon_sim::{Engine, EngineRegistry, EngineStatus, Metric};

/// One entry of the engine selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineListEntry {
    pub name: String,
    pub status: EngineStatus,
    pub selected: bool,
}

/// Headline value with its performance bar fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCard {
    pub metric: Metric,
    pub value: String,
    pub unit: &'static str,
    pub performance: f64,
}

/// Bar of the current-parameters chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterBar {
    pub label: &'static str,
    pub value: f64,
}

pub fn engine_list(registry: &EngineRegistry) -> Vec<EngineListEntry> {
    let selected = registry.selected();
    registry
        .iter()
        .map(|(name, engine)| EngineListEntry {
            name: name.to_owned(),
            status: engine.status(),
            selected: selected == Some(name),
        })
        .collect()
}

pub fn status_cards(engine: &Engine) -> Vec<StatusCard> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let (value, unit) = match metric {
                Metric::Rpm => (group_thousands(engine.rpm()), ""),
                Metric::Egt => (engine.egt().to_string(), "°C"),
                Metric::FuelFlow => (engine.fuel_flow().to_string(), "kg/h"),
                Metric::Thrust => (format!("{:.1}", engine.thrust_kn()), "kN"),
            };
            StatusCard {
                metric,
                value,
                unit,
                performance: metric.performance(engine.metric_value(metric)),
            }
        })
        .collect()
}

/// RPM and fuel flow are scaled down so all bars share one axis.
pub fn parameter_bars(engine: &Engine) -> Vec<ParameterBar> {
    vec![
        ParameterBar {
            label: "RPM",
            value: engine.rpm() / 150.0,
        },
        ParameterBar {
            label: "EGT",
            value: engine.egt(),
        },
        ParameterBar {
            label: "Fuel Flow",
            value: engine.fuel_flow() / 30.0,
        },
        ParameterBar {
            label: "Oil Pressure",
            value: engine.oil_pressure(),
        },
        ParameterBar {
            label: "Efficiency",
            value: engine.efficiency(),
        },
    ]
}

/// Round to an integer and insert `,` between digit groups.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmon_sim::seed;

    #[test]
    fn groups_digits() {
        assert_eq!(group_thousands(12_450.0), "12,450");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000_000.0), "1,000,000");
        assert_eq!(group_thousands(-1_234.4), "-1,234");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn status_cards_for_seed_engine() {
        let registry = seed::seeded_registry();
        let cards = status_cards(registry.get("TF-850").unwrap());
        let values: Vec<(&str, &str)> = cards
            .iter()
            .map(|card| (card.value.as_str(), card.unit))
            .collect();
        assert_eq!(
            values,
            vec![("12,450", ""), ("658", "°C"), ("2840", "kg/h"), ("33.5", "kN")]
        );
        assert!((cards[0].performance - 49.0).abs() < 1e-9);
        assert!((cards[1].performance - 29.0).abs() < 1e-9);
    }

    #[test]
    fn parameter_bars_are_scaled() {
        let registry = seed::seeded_registry();
        let bars = parameter_bars(registry.get("GT-9000X").unwrap());
        assert_eq!(bars.len(), 5);
        assert!((bars[0].value - 11_200.0 / 150.0).abs() < 1e-9);
        assert!((bars[2].value - 3_100.0 / 30.0).abs() < 1e-9);
        assert_eq!(bars[4].value, 91.8);
    }

    #[test]
    fn engine_list_marks_selection() {
        let mut registry = seed::seeded_registry();
        registry.select("GT-9000X").unwrap();
        let list = engine_list(&registry);
        assert_eq!(list.len(), 3);
        assert!(list[1].selected);
        assert!(!list[0].selected);
        assert_eq!(list[2].status, EngineStatus::Critical);
    }
}
