// ============================================================================
// storedlist Library
// ============================================================================

pub mod core;
pub mod observable;
pub mod persist;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{Result, StoreError};
pub use observable::{
    ChangeHook, ChangeKind, EventLog, HookRegistry, ListEvent, ListObserver, NoopObserver,
    ObservableList, Slice, hook,
};
pub use persist::{StoreSync, StoredList};
pub use storage::{
    BackingStore, Codec, DurabilityMode, FileStore, Format, MemoryStore, StoreConfig,
};
