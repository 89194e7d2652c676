//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Shared primitives and utilities for the monitor runtime."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use chrono::{DateTime, NaiveDate, TimeZone};

/// Hour and minute as shown next to an alert, e.g. `14:23`.
pub fn alert_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}

/// Date and time strings for the dashboard header clock.
pub fn clock_display<Tz: TimeZone>(at: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    (
        at.format("%Y-%m-%d").to_string(),
        at.format("%H:%M:%S").to_string(),
    )
}

/// File name used when exporting a dashboard report for the given day.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("engine-report-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_alert_time_as_hours_and_minutes() {
        let at = Utc.with_ymd_and_hms(2025, 7, 28, 9, 5, 42).unwrap();
        assert_eq!(alert_time(&at), "09:05");
    }

    #[test]
    fn clock_display_splits_date_and_time() {
        let at = Utc.with_ymd_and_hms(2025, 7, 28, 14, 23, 1).unwrap();
        let (date, time) = clock_display(&at);
        assert_eq!(date, "2025-07-28");
        assert_eq!(time, "14:23:01");
    }

    #[test]
    fn report_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert_eq!(report_file_name(date), "engine-report-2025-08-01.json");
    }
}
