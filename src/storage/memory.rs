use super::engine::BackingStore;
use crate::core::{Result, StoreError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryState {
    bytes: Vec<u8>,
    writes: u64,
    fail_writes: bool,
}

/// In-process backing store.
///
/// Clones share the same buffer, so a second sequence opened on a clone reads
/// what the first one wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    name: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    /// A store that already holds `bytes`.
    pub fn with_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MemoryState {
                bytes,
                ..Default::default()
            })),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        Ok(self.state.lock()?.bytes.clone())
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> Result<u64> {
        Ok(self.state.lock()?.writes)
    }

    /// Makes every following write fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) -> Result<()> {
        self.state.lock()?.fail_writes = fail;
        Ok(())
    }
}

impl BackingStore for MemoryStore {
    fn read(&self) -> Result<Vec<u8>> {
        self.bytes()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock()?;
        if state.fail_writes {
            return Err(StoreError::StorageWrite(format!(
                "Memory store '{}' rejected write of {} bytes",
                self.name,
                bytes.len()
            )));
        }
        state.bytes = bytes.to_vec();
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory://{}", self.name)
    }
}
