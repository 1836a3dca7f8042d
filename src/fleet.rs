use chrono::NaiveDate;
use tracing::debug;

use crate::due::{collect_due, DueEntry};
use crate::error::{Error, Result};
use crate::models::Machine;
use crate::storage::JsonStore;

/// The in-memory machine collection and the store it is loaded from.
///
/// Mutations stay in memory until [`Fleet::save`] is called.
#[derive(Debug)]
pub struct Fleet {
    store: JsonStore,
    machines: Vec<Machine>,
}

impl Fleet {
    /// An empty fleet bound to `store`, without reading it.
    pub fn new(store: JsonStore) -> Self {
        Fleet {
            store,
            machines: Vec::new(),
        }
    }

    /// Loads the fleet from `store`.
    pub fn open(store: JsonStore) -> Result<Self> {
        let machines = store.load()?;
        Ok(Fleet { store, machines })
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn machine(&self, index: usize) -> Result<&Machine> {
        self.machines.get(index).ok_or(Error::MachineNotFound(index))
    }

    pub fn machine_mut(&mut self, index: usize) -> Result<&mut Machine> {
        self.machines.get_mut(index).ok_or(Error::MachineNotFound(index))
    }

    /// Appends a machine and returns its index.
    pub fn add_machine(&mut self, machine: Machine) -> usize {
        debug!(name = %machine.name(), machine_type = %machine.machine_type(), "machine added");
        self.machines.push(machine);
        self.machines.len() - 1
    }

    pub fn remove_machine(&mut self, index: usize) -> Result<Machine> {
        if index >= self.machines.len() {
            return Err(Error::MachineNotFound(index));
        }
        let machine = self.machines.remove(index);
        debug!(name = %machine.name(), "machine removed");
        Ok(machine)
    }

    /// Discards in-memory changes and reads the store again.
    pub fn reload(&mut self) -> Result<()> {
        self.machines = self.store.load()?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.machines)?;
        Ok(())
    }

    /// Every overdue task in the fleet.
    pub fn due_tasks(&self, today: NaiveDate) -> Vec<DueEntry> {
        collect_due(&self.machines, today)
    }
}
