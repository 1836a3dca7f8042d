use chrono::NaiveDate;
use upkeep::models::today;
use upkeep::{MaintenanceTask, TaskRecord, UsageTracking, ValidationError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tracked_task(count: f64) -> MaintenanceTask {
    let usage = UsageTracking::from_flag(true, Some(40.0), Some(count));
    MaintenanceTask::new("filter", "Filter Change", 90, usage).unwrap()
}

#[test]
fn time_only_task_drops_usage_inputs() {
    let usage = UsageTracking::from_flag(false, Some(40.0), Some(12.0));
    let task = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, usage).unwrap();
    assert!(!task.has_usage());
    assert_eq!(task.threshold_usage(), None);
    assert_eq!(task.usage_count(), None);

    let record = TaskRecord {
        name: "Grinder Cleaning".into(),
        has_usage: false,
        threshold_days: 30,
        threshold_usage: Some(5.0),
        last_date: None,
        usage_count: Some(3.0),
    };
    let task = MaintenanceTask::from_record("cleaning", record).unwrap();
    assert_eq!(task.threshold_usage(), None);
    assert_eq!(task.usage_count(), None);
}

#[test]
fn tracked_task_defaults_count_to_zero() {
    let usage = UsageTracking::from_flag(true, Some(300.0), None);
    let task = MaintenanceTask::new("descale", "Descaling", 90, usage).unwrap();
    assert_eq!(task.usage_count(), Some(0.0));
    assert_eq!(task.last_date(), None);
}

#[test]
fn new_rejects_invalid_fields() {
    assert_eq!(
        MaintenanceTask::new("x", "X", 0, UsageTracking::TimeOnly).unwrap_err(),
        ValidationError::InvalidThresholdDays("0".into())
    );
    assert_eq!(
        MaintenanceTask::new("", "X", 1, UsageTracking::TimeOnly).unwrap_err(),
        ValidationError::EmptyTaskId
    );
    assert_eq!(
        MaintenanceTask::new("x", " ", 1, UsageTracking::TimeOnly).unwrap_err(),
        ValidationError::EmptyName
    );
    assert!(matches!(
        MaintenanceTask::new("x", "X", 1, UsageTracking::tracked(-4.0)),
        Err(ValidationError::InvalidThresholdUsage(_))
    ));
}

#[test]
fn register_usage_accumulates() {
    let mut task = tracked_task(10.0);
    task.register_usage("2.5").unwrap();
    task.register_usage(" 7 ").unwrap();
    assert_eq!(task.usage_count(), Some(19.5));
}

#[test]
fn register_usage_non_numeric_leaves_count() {
    let mut task = tracked_task(10.0);
    let err = task.register_usage("ten").unwrap_err();
    assert_eq!(err, ValidationError::NonNumericQuantity("ten".into()));
    assert_eq!(task.usage_count(), Some(10.0));
}

#[test]
fn register_usage_on_time_only_is_noop() {
    let mut task = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, UsageTracking::TimeOnly).unwrap();
    let before = task.clone();
    task.register_usage("5").unwrap();
    task.register_usage("garbage").unwrap();
    assert_eq!(task, before);
}

#[test]
fn register_maintenance_sets_today_and_resets_usage() {
    let mut task = tracked_task(35.0);
    task.register_maintenance();
    assert_eq!(task.last_date(), Some(today()));
    assert_eq!(task.usage_count(), Some(0.0));

    let mut time_only = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, UsageTracking::TimeOnly).unwrap();
    time_only.register_maintenance_on(date(2024, 3, 1));
    assert_eq!(time_only.last_date(), Some(date(2024, 3, 1)));
    assert_eq!(time_only.usage_count(), None);
}

#[test]
fn set_usage_tracking_keeps_or_resets_count() {
    let mut task = tracked_task(12.0);
    task.set_usage_tracking(true, Some(60.0)).unwrap();
    assert_eq!(task.threshold_usage(), Some(60.0));
    assert_eq!(task.usage_count(), Some(12.0));

    task.set_usage_tracking(false, Some(60.0)).unwrap();
    assert_eq!(task.usage(), &UsageTracking::TimeOnly);

    task.set_usage_tracking(true, Some(60.0)).unwrap();
    assert_eq!(task.usage_count(), Some(0.0));

    assert!(task.set_usage_tracking(true, Some(0.0)).is_err());
    assert_eq!(task.threshold_usage(), Some(60.0));
}

#[test]
fn record_round_trip() {
    let task = tracked_task(17.25).with_last_date(Some(date(2024, 2, 29)));
    let back = MaintenanceTask::from_record(task.task_id(), task.to_record()).unwrap();
    assert_eq!(back, task);

    let task = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, UsageTracking::TimeOnly).unwrap();
    let back = MaintenanceTask::from_record("cleaning", task.to_record()).unwrap();
    assert_eq!(back, task);
}

#[test]
fn record_wire_shape() {
    let task = tracked_task(3.0).with_last_date(Some(date(2024, 1, 15)));
    let json = serde_json::to_value(task.to_record()).unwrap();
    assert_eq!(json["name"], "Filter Change");
    assert_eq!(json["has_usage"], true);
    assert_eq!(json["threshold_days"], 90);
    assert_eq!(json["threshold_usage"], 40.0);
    assert_eq!(json["last_date"], "2024-01-15");
    assert_eq!(json["usage_count"], 3.0);
    assert!(json.get("task_id").is_none());

    let time_only = MaintenanceTask::new("cleaning", "Grinder Cleaning", 30, UsageTracking::TimeOnly).unwrap();
    let json = serde_json::to_value(time_only.to_record()).unwrap();
    assert!(json.get("usage_count").is_none());
    assert!(json["threshold_usage"].is_null());
    assert!(json["last_date"].is_null());
}

#[test]
fn record_reader_tolerates_missing_fields() {
    let record: TaskRecord = serde_json::from_str(
        r#"{"name": "Descaling", "has_usage": true, "threshold_days": 90, "threshold_usage": 300, "last_date": null}"#,
    )
    .unwrap();
    let task = MaintenanceTask::from_record("descale", record).unwrap();
    assert_eq!(task.usage_count(), Some(0.0));
    assert_eq!(task.threshold_usage(), Some(300.0));

    let record: TaskRecord = serde_json::from_str(
        r#"{"name": "Cleaning", "threshold_days": 30, "usage_count": null}"#,
    )
    .unwrap();
    let task = MaintenanceTask::from_record("cleaning", record).unwrap();
    assert!(!task.has_usage());
}

#[test]
fn register_usage_rejects_overflowing_total() {
    let mut task = tracked_task(0.0);
    task.register_usage("1e308").unwrap();
    let err = task.register_usage("1e308").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidUsageCount(_)));
    assert_eq!(task.usage_count(), Some(1e308));

    let back = MaintenanceTask::from_record(task.task_id(), task.to_record()).unwrap();
    assert_eq!(back, task);
}
