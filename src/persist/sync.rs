use crate::core::{Result, StoreError};
use crate::observable::{ChangeKind, ListObserver};
use crate::storage::{BackingStore, Codec};
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};

/// Observer that rewrites the backing store on every aggregate change.
///
/// Element events are ignored; only the aggregate carries a write.
#[derive(Debug)]
pub struct StoreSync<S, C> {
    store: S,
    codec: C,
    writes: u64,
}

impl<S, C> StoreSync<S, C> {
    pub fn new(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            writes: 0,
        }
    }

    pub fn backing_store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Snapshot writes that reached the backing store.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl<S: BackingStore, C: Codec> StoreSync<S, C> {
    /// Reads and decodes the stored snapshot. Zero bytes decode to an empty
    /// sequence; anything the codec rejects is reported as corrupt state.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let bytes = self.store.read()?;
        if bytes.is_empty() {
            debug!("snapshot '{}' is empty", self.store.location());
            return Ok(Vec::new());
        }

        let items: Vec<T> = self.codec.decode(&bytes).map_err(|e| StoreError::CorruptState {
            location: self.store.location(),
            reason: e.to_string(),
        })?;
        debug!(
            "loaded {} items ({} bytes) from '{}'",
            items.len(),
            bytes.len(),
            self.store.location()
        );
        Ok(items)
    }

    /// Encodes all of `items` and replaces the stored snapshot. A store that
    /// is not durable is skipped and the write is not counted.
    pub fn store<T: Serialize>(&mut self, items: &[T]) -> Result<()> {
        if !self.store.is_durable() {
            debug!(
                "skipping write of {} items to non-durable '{}'",
                items.len(),
                self.store.location()
            );
            return Ok(());
        }

        let bytes = self.codec.encode(items)?;
        if let Err(err) = self.store.write(&bytes) {
            warn!(
                "snapshot write failed: location='{}' items={} error='{}'",
                self.store.location(),
                items.len(),
                err
            );
            return Err(err);
        }
        self.writes += 1;
        debug!(
            "stored {} items ({} bytes) to '{}'",
            items.len(),
            bytes.len(),
            self.store.location()
        );
        Ok(())
    }
}

impl<T, S, C> ListObserver<T> for StoreSync<S, C>
where
    T: Serialize,
    S: BackingStore,
    C: Codec,
{
    fn notify_changed(&mut self, _kind: ChangeKind, contents: &[T]) -> Result<()> {
        self.store(contents)
    }
}
