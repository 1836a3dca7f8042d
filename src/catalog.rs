use crate::models::{MaintenanceTask, UsageTracking};

/// Type key given to machines created without a type.
pub const CUSTOM_TYPE: &str = "custom";
/// Label shown in list views for types the catalog does not know.
pub const CUSTOM_LABEL: &str = "Custom";

/// Default maintenance task for a machine type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskTemplate {
    /// Becomes the task id of seeded tasks.
    pub key: &'static str,
    pub name: &'static str,
    pub has_usage: bool,
    pub threshold_days: u32,
    pub threshold_usage: Option<f64>,
}

impl TaskTemplate {
    /// A never-performed task with a zeroed usage counter.
    pub fn instantiate(&self) -> MaintenanceTask {
        let usage = UsageTracking::from_flag(self.has_usage, self.threshold_usage, Some(0.0));
        MaintenanceTask::seeded(self.key, self.name, self.threshold_days, usage)
    }
}

/// A known kind of machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineType {
    pub key: &'static str,
    pub display_name: &'static str,
    pub maintenance: &'static [TaskTemplate],
}

impl MachineType {
    pub fn default_tasks(&self) -> Vec<MaintenanceTask> {
        self.maintenance.iter().map(TaskTemplate::instantiate).collect()
    }
}

static MACHINE_TYPES: &[MachineType] = &[
    MachineType {
        key: "coffee_machine",
        display_name: "Coffee Machine",
        maintenance: &[
            TaskTemplate {
                key: "filter",
                name: "Filter Change",
                has_usage: true,
                threshold_days: 90,
                threshold_usage: Some(40.0),
            },
            TaskTemplate {
                key: "descale",
                name: "Descaling",
                has_usage: true,
                threshold_days: 90,
                threshold_usage: Some(300.0),
            },
        ],
    },
    MachineType {
        key: "grinder",
        display_name: "Grinder",
        maintenance: &[TaskTemplate {
            key: "cleaning",
            name: "Grinder Cleaning",
            has_usage: false,
            threshold_days: 30,
            threshold_usage: None,
        }],
    },
];

/// All catalog entries, in declaration order.
pub fn machine_types() -> &'static [MachineType] {
    MACHINE_TYPES
}

/// Looks up a machine type by key.
pub fn lookup(machine_type: &str) -> Option<&'static MachineType> {
    MACHINE_TYPES.iter().find(|t| t.key == machine_type)
}

pub fn type_label(machine_type: &str) -> &'static str {
    lookup(machine_type).map_or(CUSTOM_LABEL, |t| t.display_name)
}

pub fn type_display(machine_type: &str) -> &str {
    lookup(machine_type).map_or(machine_type, |t| t.display_name)
}
