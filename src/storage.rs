use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::StorageError;
use crate::models::{Machine, MachineRecord};

/// Top-level shape of the data file: `{"machines": [...]}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FleetRecord {
    #[serde(default)]
    pub machines: Vec<MachineRecord>,
}

/// JSON file holding the whole machine collection.
///
/// Every save rewrites the full file. Writes go to a temporary file in the
/// same directory which is then renamed over the target, so a reader never
/// observes a half-written file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all machines.
    ///
    /// A missing file is the initial state and yields an empty collection.
    pub fn load(&self) -> Result<Vec<Machine>, StorageError> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no data file yet; starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let record: FleetRecord = serde_json::from_str(&s)?;
        let machines = record
            .machines
            .into_iter()
            .map(Machine::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        info!(path = %self.path.display(), machines = machines.len(), "loaded machines");
        Ok(machines)
    }

    /// Replaces the stored collection with `machines`.
    pub fn save(&self, machines: &[Machine]) -> Result<(), StorageError> {
        let record = FleetRecord {
            machines: machines.iter().map(Machine::to_record).collect(),
        };
        let s = serde_json::to_string_pretty(&record)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(s.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        info!(path = %self.path.display(), machines = machines.len(), "saved machines");
        Ok(())
    }
}
