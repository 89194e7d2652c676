//! ---
//! tmon_section: "02-simulation"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Reference data and chart transforms for dashboard views."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use chrono::NaiveDate;
use serde::Serialize;

const SOON_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Where a task sits relative to its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DueState {
    Overdue,
    Soon,
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceTask {
    pub engine: String,
    pub task: String,
    pub due: NaiveDate,
    pub priority: Priority,
}

impl MaintenanceTask {
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due - today).num_days()
    }

    /// Overdue once past the due date; due within a week counts as soon.
    pub fn due_state(&self, today: NaiveDate) -> DueState {
        match self.days_until_due(today) {
            days if days < 0 => DueState::Overdue,
            days if days <= SOON_WINDOW_DAYS => DueState::Soon,
            _ => DueState::Scheduled,
        }
    }
}

/// Static reference schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaintenanceSchedule {
    tasks: Vec<MaintenanceTask>,
}

impl MaintenanceSchedule {
    pub fn new(tasks: Vec<MaintenanceTask>) -> Self {
        Self { tasks }
    }

    pub fn seeded() -> Self {
        let task = |engine: &str, task: &str, (y, m, d): (i32, u32, u32), priority| {
            NaiveDate::from_ymd_opt(y, m, d).map(|due| MaintenanceTask {
                engine: engine.to_owned(),
                task: task.to_owned(),
                due,
                priority,
            })
        };
        Self::new(
            [
                task("TF-850", "Borescope Inspection", (2025, 8, 15), Priority::Medium),
                task("GT-9000X", "Oil Change", (2025, 7, 30), Priority::High),
                task("AE-7500", "Compressor Wash", (2025, 7, 28), Priority::Critical),
                task("TF-850", "Filter Replacement", (2025, 8, 20), Priority::Low),
            ]
            .into_iter()
            .flatten()
            .collect(),
        )
    }

    pub fn tasks(&self) -> &[MaintenanceTask] {
        &self.tasks
    }

    pub fn for_engine<'a>(&'a self, engine: &'a str) -> impl Iterator<Item = &'a MaintenanceTask> {
        self.tasks.iter().filter(move |task| task.engine == engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seeded_schedule_has_four_tasks() {
        let schedule = MaintenanceSchedule::seeded();
        assert_eq!(schedule.tasks().len(), 4);
        assert_eq!(schedule.for_engine("TF-850").count(), 2);
    }

    #[test]
    fn due_state_windows() {
        let schedule = MaintenanceSchedule::seeded();
        let today = day(2025, 7, 29);
        let states: Vec<DueState> = schedule
            .tasks()
            .iter()
            .map(|task| task.due_state(today))
            .collect();
        assert_eq!(
            states,
            vec![
                DueState::Scheduled,
                DueState::Soon,
                DueState::Overdue,
                DueState::Scheduled
            ]
        );
    }

    #[test]
    fn due_today_and_in_a_week_are_soon() {
        let schedule = MaintenanceSchedule::seeded();
        let wash = &schedule.tasks()[2];
        assert_eq!(wash.due_state(day(2025, 7, 28)), DueState::Soon);
        assert_eq!(wash.due_state(day(2025, 7, 21)), DueState::Soon);
        assert_eq!(wash.due_state(day(2025, 7, 20)), DueState::Scheduled);
    }

    #[test]
    fn serializes_as_plain_list() {
        let value = serde_json::to_value(MaintenanceSchedule::seeded()).unwrap();
        assert_eq!(value[1]["task"], "Oil Change");
        assert_eq!(value[1]["due"], "2025-07-30");
        assert_eq!(value[1]["priority"], "High");
    }
}
