use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Change hook is already registered")]
    DuplicateHook,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Value not found in sequence")]
    ValueNotFound,

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Invalid slice: {0}")]
    InvalidSlice(String),

    #[error("Corrupt state in '{location}': {reason}")]
    CorruptState { location: String, reason: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
