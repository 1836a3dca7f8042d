use thiserror::Error;

/// Rejected input: a value that could not be turned into a valid task or machine field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("quantity must be numeric, got '{0}'")]
    NonNumericQuantity(String),
    #[error("threshold days must be a positive integer, got '{0}'")]
    InvalidThresholdDays(String),
    #[error("threshold usage must be a positive number, got '{0}'")]
    InvalidThresholdUsage(String),
    #[error("usage count must be a finite number, got '{0}'")]
    InvalidUsageCount(String),
    #[error("invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error("task id must not be empty")]
    EmptyTaskId,
}

/// Failure reading or writing the backing store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to replace data file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("invalid stored record: {0}")]
    InvalidRecord(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("maintenance task '{0}' not found")]
    TaskNotFound(String),
    #[error("no machine at index {0}")]
    MachineNotFound(usize),
    #[error("a maintenance task with id '{0}' already exists")]
    DuplicateTask(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
