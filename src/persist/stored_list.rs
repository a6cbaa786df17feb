use super::sync::StoreSync;
use crate::core::Result;
use crate::observable::{ChangeHook, HookRegistry, ObservableList, Slice};
use crate::storage::{BackingStore, Codec, FileStore, Format, StoreConfig};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::ops::Deref;
use std::path::Path;

/// Observable sequence whose every change is written through to a backing
/// store as a full snapshot.
///
/// Each aggregate change runs the registered hooks and then rewrites the
/// whole snapshot, so hooks fire before the write has completed. A failed
/// write is returned from the mutating call; the in-memory change stays in
/// place and [`store`](Self::store) can be used to retry.
///
/// # Examples
///
/// ```no_run
/// use storedlist::StoredList;
///
/// # fn main() -> storedlist::Result<()> {
/// let mut list = StoredList::create("numbers.json", vec![1, 2, 3])?;
/// list.append(4)?;
///
/// let reopened: StoredList<i32> = StoredList::open("numbers.json")?;
/// assert_eq!(reopened.as_slice(), &[1, 2, 3, 4]);
/// # Ok(())
/// # }
/// ```
pub struct StoredList<T, S = FileStore, C = Format> {
    list: ObservableList<T, StoreSync<S, C>>,
}

impl<T> StoredList<T, FileStore, Format>
where
    T: Serialize + DeserializeOwned,
{
    /// Opens `path` with default settings and loads its contents.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(&StoreConfig::new(path), None)
    }

    /// Seeds `path` with `items`, replacing whatever it held.
    pub fn create<P, I>(path: P, items: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = T>,
    {
        Self::from_config(&StoreConfig::new(path), Some(items.into_iter().collect()))
    }

    pub fn from_config(config: &StoreConfig, initial: Option<Vec<T>>) -> Result<Self> {
        Self::with_store(FileStore::from_config(config), config.format, initial)
    }
}

impl<T, S, C> StoredList<T, S, C>
where
    T: Serialize + DeserializeOwned,
    S: BackingStore,
    C: Codec,
{
    /// With `initial`, adopts it and writes it out once before returning.
    /// Without, reads the store; an empty store yields an empty sequence.
    pub fn with_store(store: S, codec: C, initial: Option<Vec<T>>) -> Result<Self> {
        let mut sync = StoreSync::new(store, codec);
        let items = match initial {
            Some(items) => {
                sync.store(&items)?;
                items
            }
            None => sync.load()?,
        };
        debug!(
            "opened stored list at '{}' with {} items",
            sync.backing_store().location(),
            items.len()
        );
        Ok(Self {
            list: ObservableList::with_observer(items, sync),
        })
    }
}

impl<T, S, C> StoredList<T, S, C>
where
    T: Serialize,
    S: BackingStore,
    C: Codec,
{
    /// Writes the current contents unconditionally, e.g. to retry after a
    /// failed write.
    pub fn store(&mut self) -> Result<()> {
        let (items, sync) = self.list.split_observer();
        sync.store(items)
    }

    pub fn append(&mut self, value: T) -> Result<()> {
        self.list.append(value)
    }

    pub fn insert(&mut self, index: isize, value: T) -> Result<()> {
        self.list.insert(index, value)
    }

    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.extend(values)
    }

    pub fn concat<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.concat(other)
    }

    pub fn pop(&mut self, index: Option<isize>) -> Result<T> {
        self.list.pop(index)
    }

    pub fn delete(&mut self, index: isize) -> Result<()> {
        self.list.delete(index)
    }

    pub fn remove(&mut self, value: &T) -> Result<T>
    where
        T: PartialEq,
    {
        self.list.remove(value)
    }

    pub fn delete_slice(&mut self, slice: impl Into<Slice>) -> Result<usize> {
        self.list.delete_slice(slice)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.list.clear()
    }

    pub fn set(&mut self, index: isize, value: T) -> Result<T> {
        self.list.set(index, value)
    }

    pub fn assign_slice<I>(&mut self, slice: impl Into<Slice>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.assign_slice(slice, values)
    }

    pub fn replicate(&mut self, times: isize) -> Result<()>
    where
        T: Clone,
    {
        self.list.replicate(times)
    }
}

impl<T, S, C> StoredList<T, S, C> {
    pub fn on_change(&mut self, hook: ChangeHook) -> Result<ChangeHook> {
        self.list.on_change(hook)
    }

    pub fn remove_hook(&mut self, hook: &ChangeHook) -> bool {
        self.list.remove_hook(hook)
    }

    pub fn hooks(&self) -> &HookRegistry {
        self.list.hooks()
    }

    pub fn reverse(&mut self) -> Result<()> {
        self.list.reverse()
    }

    pub fn sort(&mut self) -> Result<()> {
        self.list.sort()
    }

    pub fn as_slice(&self) -> &[T] {
        self.list.as_slice()
    }

    pub fn at(&self, index: isize) -> Option<&T> {
        self.list.at(index)
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.list.count(value)
    }

    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.list.index_of(value)
    }

    pub fn backing_store(&self) -> &S {
        self.list.observer().backing_store()
    }

    /// Successful snapshot writes made by this instance, including the
    /// initial one when seeded.
    pub fn writes(&self) -> u64 {
        self.list.observer().writes()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.list.into_vec()
    }
}

impl<T, S: BackingStore, C> StoredList<T, S, C> {
    pub fn location(&self) -> String {
        self.backing_store().location()
    }
}

impl<T, S, C> Deref for StoredList<T, S, C> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.list.as_slice()
    }
}

impl<T: fmt::Debug, S, C> fmt::Debug for StoredList<T, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredList(")?;
        f.debug_list().entries(self.list.as_slice()).finish()?;
        f.write_str(")")
    }
}
