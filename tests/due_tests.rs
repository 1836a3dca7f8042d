use chrono::{Duration, NaiveDate};
use upkeep::due::collect_due;
use upkeep::{DueReason, Machine, MaintenanceTask, UsageTracking};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn filter_task(count: f64, last: Option<NaiveDate>) -> MaintenanceTask {
    let usage = UsageTracking::from_flag(true, Some(40.0), Some(count));
    MaintenanceTask::new("filter", "Filter Change", 90, usage)
        .unwrap()
        .with_last_date(last)
}

#[test]
fn never_performed_is_due() {
    let today = date(2024, 6, 1);
    let task = filter_task(0.0, None);
    assert_eq!(task.due_reason(today), Some(DueReason::NeverPerformed));
    assert!(task.is_overdue(today));
    assert_eq!(task.days_since_last(today), None);
    assert_eq!(task.days_remaining(today), None);
}

#[test]
fn time_threshold_is_inclusive() {
    let last = date(2024, 1, 1);
    let task = filter_task(0.0, Some(last));

    let day_before = last + Duration::days(89);
    assert!(!task.is_overdue(day_before));
    assert_eq!(task.days_remaining(day_before), Some(1));

    let due_day = last + Duration::days(90);
    assert_eq!(task.due_reason(due_day), Some(DueReason::TimeElapsed));
    assert_eq!(task.days_since_last(due_day), Some(90));
    assert_eq!(task.days_remaining(due_day), Some(0));
}

#[test]
fn usage_threshold_is_inclusive() {
    let today = date(2024, 1, 10);
    let last = Some(date(2024, 1, 1));

    let task = filter_task(39.5, last);
    assert!(!task.is_overdue(today));
    assert_eq!(task.usage_remaining(), Some(0.5));

    let task = filter_task(40.0, last);
    assert_eq!(task.due_reason(today), Some(DueReason::UsageReached));

    let task = filter_task(55.0, last);
    assert_eq!(task.usage_remaining(), Some(-15.0));
    assert!(task.is_overdue(today));
}

#[test]
fn time_only_task_ignores_usage() {
    let today = date(2024, 1, 10);
    let task = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, UsageTracking::TimeOnly)
        .unwrap()
        .with_last_date(Some(date(2024, 1, 1)));
    assert_eq!(task.usage_remaining(), None);
    assert!(!task.is_overdue(today));
    assert_eq!(task.days_remaining(today), Some(21));
}

#[test]
fn tracked_without_threshold_is_time_only_for_due() {
    let today = date(2024, 1, 10);
    let usage = UsageTracking::from_flag(true, None, Some(1_000.0));
    let task = MaintenanceTask::new("rinse", "Rinse", 30, usage)
        .unwrap()
        .with_last_date(Some(date(2024, 1, 1)));
    assert_eq!(task.usage_remaining(), None);
    assert!(!task.is_overdue(today));
}

#[test]
fn maintenance_clears_due_state() {
    let today = date(2024, 6, 1);
    let mut task = filter_task(80.0, Some(date(2024, 1, 1)));
    assert!(task.is_overdue(today));
    task.register_maintenance_on(today);
    assert!(!task.is_overdue(today));
}

#[test]
fn collect_due_reports_fleet_order() {
    let today = date(2024, 6, 1);
    let mut coffee = Machine::new("Office Coffee", "coffee_machine", None, None).unwrap();
    coffee.register_maintenance_on("filter", date(2024, 5, 20)).unwrap();
    let mut grinder = Machine::new("Grinder", "grinder", None, None).unwrap();
    grinder.register_maintenance_on("cleaning", date(2024, 4, 1)).unwrap();
    let mut quiet = Machine::new("Quiet", "grinder", None, None).unwrap();
    quiet.register_maintenance_on("cleaning", today).unwrap();

    let due = collect_due(&[coffee, grinder, quiet], today);
    let summary: Vec<_> = due
        .iter()
        .map(|e| (e.machine_index, e.task_id.as_str(), e.reason))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, "descale", DueReason::NeverPerformed),
            (1, "cleaning", DueReason::TimeElapsed),
        ]
    );
    assert_eq!(due[1].days_since_last, Some(61));
    assert_eq!(due[1].machine_name, "Grinder");
}
