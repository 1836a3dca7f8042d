//! # upkeep
//!
//! Maintenance tracking for a small fleet of machines such as coffee machines
//! and grinders. Each machine carries maintenance tasks that fall due after a
//! number of days and, for usage-tracked tasks, after a given amount of use
//! (litres processed, for example).
//!
//! The whole fleet lives in one JSON file, loaded into a [`Fleet`] and written
//! back explicitly with [`Fleet::save`].

pub mod catalog;
pub mod commands;
pub mod due;
pub mod error;
pub mod fleet;
pub mod input;
pub mod logging;
pub mod models;
pub mod storage;

pub use due::{DueEntry, DueReason};
pub use error::{Error, Result, StorageError, ValidationError};
pub use fleet::Fleet;
pub use models::{Machine, MachineRecord, MaintenanceTask, TaskRecord, UsageTracking};
pub use storage::{FleetRecord, JsonStore};
