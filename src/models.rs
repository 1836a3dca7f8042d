use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog;
use crate::error::{Error, ValidationError};
use crate::input::parse_quantity;

/// Today's date on the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// How a task accrues usage between completions.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageTracking {
    /// Due by elapsed time only; there is no usage counter at all.
    TimeOnly,
    /// Usage (litres, cycles, ...) accumulates until the next maintenance.
    Tracked {
        threshold_usage: Option<f64>,
        usage_count: f64,
    },
}

impl UsageTracking {
    /// Tracked usage with a threshold and a fresh counter.
    pub fn tracked(threshold_usage: f64) -> Self {
        UsageTracking::Tracked {
            threshold_usage: Some(threshold_usage),
            usage_count: 0.0,
        }
    }

    /// Builds the tracking mode from the flat `has_usage` representation.
    ///
    /// When `has_usage` is false both optional values are dropped; otherwise a
    /// missing counter starts at zero.
    pub fn from_flag(has_usage: bool, threshold_usage: Option<f64>, usage_count: Option<f64>) -> Self {
        if has_usage {
            UsageTracking::Tracked {
                threshold_usage,
                usage_count: usage_count.unwrap_or(0.0),
            }
        } else {
            UsageTracking::TimeOnly
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self, UsageTracking::Tracked { .. })
    }

    pub fn threshold_usage(&self) -> Option<f64> {
        match self {
            UsageTracking::Tracked { threshold_usage, .. } => *threshold_usage,
            UsageTracking::TimeOnly => None,
        }
    }

    pub fn usage_count(&self) -> Option<f64> {
        match self {
            UsageTracking::Tracked { usage_count, .. } => Some(*usage_count),
            UsageTracking::TimeOnly => None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let UsageTracking::Tracked { threshold_usage, usage_count } = self {
            if let Some(t) = threshold_usage {
                if !t.is_finite() || *t <= 0.0 {
                    return Err(ValidationError::InvalidThresholdUsage(t.to_string()));
                }
            }
            if !usage_count.is_finite() {
                return Err(ValidationError::InvalidUsageCount(usage_count.to_string()));
            }
        }
        Ok(())
    }
}

/// A single recurring maintenance item on a machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceTask {
    task_id: String,
    name: String,
    threshold_days: u32,
    usage: UsageTracking,
    last_date: Option<NaiveDate>,
}

impl MaintenanceTask {
    /// Creates a task that has never been performed.
    pub fn new(
        task_id: impl Into<String>,
        name: impl Into<String>,
        threshold_days: u32,
        usage: UsageTracking,
    ) -> Result<Self, ValidationError> {
        let task_id = task_id.into();
        if task_id.trim().is_empty() {
            return Err(ValidationError::EmptyTaskId);
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if threshold_days == 0 {
            return Err(ValidationError::InvalidThresholdDays(threshold_days.to_string()));
        }
        usage.validate()?;
        Ok(MaintenanceTask {
            task_id,
            name,
            threshold_days,
            usage,
            last_date: None,
        })
    }

    /// Catalog templates are known-good, so seeding skips validation.
    pub(crate) fn seeded(task_id: &str, name: &str, threshold_days: u32, usage: UsageTracking) -> Self {
        MaintenanceTask {
            task_id: task_id.to_string(),
            name: name.to_string(),
            threshold_days,
            usage,
            last_date: None,
        }
    }

    pub fn with_last_date(mut self, last_date: Option<NaiveDate>) -> Self {
        self.last_date = last_date;
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    pub fn usage(&self) -> &UsageTracking {
        &self.usage
    }

    pub fn has_usage(&self) -> bool {
        self.usage.is_tracked()
    }

    pub fn threshold_usage(&self) -> Option<f64> {
        self.usage.threshold_usage()
    }

    pub fn usage_count(&self) -> Option<f64> {
        self.usage.usage_count()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    pub fn set_threshold_days(&mut self, threshold_days: u32) -> Result<(), ValidationError> {
        if threshold_days == 0 {
            return Err(ValidationError::InvalidThresholdDays(threshold_days.to_string()));
        }
        self.threshold_days = threshold_days;
        Ok(())
    }

    /// Switches usage tracking on or off, or changes the usage threshold.
    ///
    /// An already tracked task keeps its accumulated count; a task that starts
    /// tracking begins at zero. Turning tracking off discards the counter.
    pub fn set_usage_tracking(
        &mut self,
        has_usage: bool,
        threshold_usage: Option<f64>,
    ) -> Result<(), ValidationError> {
        let usage = if has_usage {
            UsageTracking::Tracked {
                threshold_usage,
                usage_count: self.usage.usage_count().unwrap_or(0.0),
            }
        } else {
            UsageTracking::TimeOnly
        };
        usage.validate()?;
        self.usage = usage;
        Ok(())
    }

    /// Adds a textual quantity to the usage counter.
    ///
    /// Time-only tasks ignore the call. A quantity that does not parse, or a
    /// total that would no longer be finite, leaves the counter untouched.
    pub fn register_usage(&mut self, quantity: &str) -> Result<(), ValidationError> {
        match &mut self.usage {
            UsageTracking::TimeOnly => {
                warn!(task_id = %self.task_id, "usage registered on a time-only task; ignoring");
                Ok(())
            }
            UsageTracking::Tracked { usage_count, .. } => {
                let qty = parse_quantity(quantity)?;
                let total = *usage_count + qty;
                if !total.is_finite() {
                    return Err(ValidationError::InvalidUsageCount(total.to_string()));
                }
                *usage_count = total;
                debug!(task_id = %self.task_id, quantity = qty, total = *usage_count, "usage registered");
                Ok(())
            }
        }
    }

    /// Marks the task as performed today.
    pub fn register_maintenance(&mut self) {
        self.register_maintenance_on(today());
    }

    /// Marks the task as performed on `date`, resetting any usage counter.
    pub fn register_maintenance_on(&mut self, date: NaiveDate) {
        self.last_date = Some(date);
        if let UsageTracking::Tracked { usage_count, .. } = &mut self.usage {
            *usage_count = 0.0;
        }
        debug!(task_id = %self.task_id, %date, "maintenance registered");
    }

    /// Persisted form. The id is not part of the record; it is the map key.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            name: self.name.clone(),
            has_usage: self.has_usage(),
            threshold_days: self.threshold_days,
            threshold_usage: self.threshold_usage(),
            last_date: self.last_date,
            usage_count: self.usage_count(),
        }
    }

    pub fn from_record(task_id: impl Into<String>, record: TaskRecord) -> Result<Self, ValidationError> {
        let usage = UsageTracking::from_flag(record.has_usage, record.threshold_usage, record.usage_count);
        let task = MaintenanceTask::new(task_id, record.name, record.threshold_days, usage)?;
        Ok(task.with_last_date(record.last_date))
    }
}

/// Stored shape of a maintenance task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub name: String,
    #[serde(default)]
    pub has_usage: bool,
    pub threshold_days: u32,
    #[serde(default)]
    pub threshold_usage: Option<f64>,
    /// Date of the last completion (YYYY-MM-DD), `null` if never performed.
    #[serde(default)]
    pub last_date: Option<NaiveDate>,
    /// Only written for usage-tracked tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<f64>,
}

/// A physical device and the maintenance tasks it needs.
///
/// Serializes through [`MachineRecord`], so a deserialized machine passes the
/// same validation as one loaded by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "MachineRecord", into = "MachineRecord")]
pub struct Machine {
    name: String,
    /// Catalog key such as `coffee_machine`, or any custom string.
    machine_type: String,
    start_date: NaiveDate,
    tasks: IndexMap<String, MaintenanceTask>,
}

impl Machine {
    /// Creates a machine.
    ///
    /// `start_date` defaults to today. Without an explicit task list, a machine
    /// of a catalog type is seeded with that type's default tasks and any other
    /// type starts empty.
    pub fn new(
        name: impl Into<String>,
        machine_type: impl Into<String>,
        start_date: Option<NaiveDate>,
        tasks: Option<Vec<MaintenanceTask>>,
    ) -> crate::Result<Machine> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let machine_type = machine_type.into();
        let tasks = match tasks {
            Some(tasks) => tasks,
            None => match catalog::lookup(&machine_type) {
                Some(kind) => {
                    debug!(machine_type = %machine_type, count = kind.maintenance.len(), "seeding default tasks");
                    kind.default_tasks()
                }
                None => Vec::new(),
            },
        };

        let mut machine = Machine {
            name,
            machine_type,
            start_date: start_date.unwrap_or_else(today),
            tasks: IndexMap::new(),
        };
        for task in tasks {
            machine.add_task(task)?;
        }
        Ok(machine)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    pub fn machine_type(&self) -> &str {
        &self.machine_type
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        self.start_date = start_date;
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &MaintenanceTask> {
        self.tasks.values()
    }

    pub fn task(&self, task_id: &str) -> Option<&MaintenanceTask> {
        self.tasks.get(task_id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Catalog display name, or the generic custom label.
    pub fn type_label(&self) -> &'static str {
        catalog::type_label(&self.machine_type)
    }

    /// Catalog display name, or the raw type string.
    pub fn type_display(&self) -> &str {
        catalog::type_display(&self.machine_type)
    }

    fn task_mut(&mut self, task_id: &str) -> crate::Result<&mut MaintenanceTask> {
        self.tasks
            .get_mut(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    pub fn register_usage(&mut self, task_id: &str, quantity: &str) -> crate::Result<()> {
        self.task_mut(task_id)?.register_usage(quantity)?;
        Ok(())
    }

    pub fn register_maintenance(&mut self, task_id: &str) -> crate::Result<()> {
        self.task_mut(task_id)?.register_maintenance();
        Ok(())
    }

    pub fn register_maintenance_on(&mut self, task_id: &str, date: NaiveDate) -> crate::Result<()> {
        self.task_mut(task_id)?.register_maintenance_on(date);
        Ok(())
    }

    pub fn add_task(&mut self, task: MaintenanceTask) -> crate::Result<()> {
        if self.tasks.contains_key(task.task_id()) {
            return Err(Error::DuplicateTask(task.task_id().to_string()));
        }
        debug!(machine = %self.name, task_id = %task.task_id(), "task added");
        self.tasks.insert(task.task_id().to_string(), task);
        Ok(())
    }

    /// Replaces the task stored under `task.task_id()`. Ids cannot be renamed.
    pub fn edit_task(&mut self, task: MaintenanceTask) -> crate::Result<()> {
        let slot = self.task_mut(task.task_id())?;
        *slot = task;
        Ok(())
    }

    pub fn remove_task(&mut self, task_id: &str) -> crate::Result<MaintenanceTask> {
        let removed = self
            .tasks
            .shift_remove(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        debug!(machine = %self.name, task_id, "task removed");
        Ok(removed)
    }

    pub fn to_record(&self) -> MachineRecord {
        MachineRecord {
            name: self.name.clone(),
            machine_type: self.machine_type.clone(),
            start_date: self.start_date,
            maintenance_tasks: self
                .tasks
                .iter()
                .map(|(id, task)| (id.clone(), task.to_record()))
                .collect(),
        }
    }

    /// Rebuilds a machine exactly as stored. Catalog defaults are never
    /// re-seeded here, so a machine whose tasks were all removed stays empty.
    pub fn from_record(record: MachineRecord) -> Result<Machine, ValidationError> {
        if record.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let mut tasks = IndexMap::with_capacity(record.maintenance_tasks.len());
        for (task_id, task) in record.maintenance_tasks {
            let task = MaintenanceTask::from_record(task_id.clone(), task)?;
            tasks.insert(task_id, task);
        }
        Ok(Machine {
            name: record.name,
            machine_type: record.machine_type,
            start_date: record.start_date,
            tasks,
        })
    }
}

/// Stored shape of a machine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MachineRecord {
    pub name: String,
    pub machine_type: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub maintenance_tasks: IndexMap<String, TaskRecord>,
}

impl TryFrom<MachineRecord> for Machine {
    type Error = ValidationError;

    fn try_from(record: MachineRecord) -> Result<Self, Self::Error> {
        Machine::from_record(record)
    }
}

impl From<Machine> for MachineRecord {
    fn from(machine: Machine) -> Self {
        machine.to_record()
    }
}
