use super::hooks::{ChangeHook, HookRegistry};
use super::observer::{ChangeKind, ListObserver, NoopObserver};
use super::slice::{Selection, Slice};
use crate::core::{Result, StoreError};
use std::fmt;
use std::ops::Deref;

/// Ordered sequence that reports every structural change.
///
/// Each mutation is broken down into single-element events delivered to the
/// observer `O`: removals walk from the highest affected index down, additions
/// walk upwards. Once the elements of a phase are accounted for, the change
/// hooks run and the observer receives one aggregate `notify_changed`.
/// Mutations that touch no element emit nothing at all.
///
/// Read access goes through `Deref<Target = [T]>`; there is no mutable view.
#[derive(Clone)]
pub struct ObservableList<T, O = NoopObserver> {
    items: Vec<T>,
    hooks: HookRegistry,
    observer: O,
}

impl<T> ObservableList<T, NoopObserver> {
    pub fn new() -> Self {
        Self::with_observer(Vec::new(), NoopObserver)
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self::with_observer(items, NoopObserver)
    }
}

impl<T, O: Default> Default for ObservableList<T, O> {
    fn default() -> Self {
        Self::with_observer(Vec::new(), O::default())
    }
}

impl<T, O> ObservableList<T, O> {
    /// Adopts `items` as-is. No events are emitted for the initial contents.
    pub fn with_observer(items: Vec<T>, observer: O) -> Self {
        Self {
            items,
            hooks: HookRegistry::new(),
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Contents alongside the observer, for observers that act on the whole
    /// sequence outside of a mutation.
    pub fn split_observer(&mut self) -> (&[T], &mut O) {
        (&self.items, &mut self.observer)
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Registers a hook to run on every aggregate change.
    pub fn on_change(&mut self, hook: ChangeHook) -> Result<ChangeHook> {
        self.hooks.register(hook)
    }

    pub fn remove_hook(&mut self, hook: &ChangeHook) -> bool {
        self.hooks.unregister(hook)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Element at `index`, counting from the end when negative.
    pub fn at(&self, index: isize) -> Option<&T> {
        self.resolve(index).ok().map(|position| &self.items[position])
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.items.iter().filter(|item| *item == value).count()
    }

    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|item| item == value)
    }

    pub fn reverse(&mut self) -> Result<()> {
        Err(StoreError::UnsupportedOperation(
            "reverse is not supported on observable sequences".to_string(),
        ))
    }

    pub fn sort(&mut self) -> Result<()> {
        Err(StoreError::UnsupportedOperation(
            "sort is not supported on observable sequences".to_string(),
        ))
    }

    fn resolve(&self, index: isize) -> Result<usize> {
        let len = self.items.len();
        let resolved = if index < 0 {
            index + len as isize
        } else {
            index
        };
        if resolved < 0 || resolved as usize >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        Ok(resolved as usize)
    }
}

impl<T, O: ListObserver<T>> ObservableList<T, O> {
    pub fn append(&mut self, value: T) -> Result<()> {
        self.items.push(value);
        let index = self.items.len() - 1;
        self.announce_added(index..index + 1);
        self.commit(ChangeKind::Added)
    }

    /// Inserts before `index`. Out-of-range positions are clamped to the
    /// ends of the sequence.
    pub fn insert(&mut self, index: isize, value: T) -> Result<()> {
        let len = self.items.len() as isize;
        let clamped = if index < 0 {
            (index + len).max(0)
        } else {
            index.min(len)
        };
        let position = clamped as usize;

        self.items.insert(position, value);
        self.announce_added(position..position + 1);
        self.commit(ChangeKind::Added)
    }

    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.items.len();
        self.items.extend(values);
        let end = self.items.len();
        if start == end {
            return Ok(());
        }
        self.announce_added(start..end);
        self.commit(ChangeKind::Added)
    }

    /// In-place concatenation; same events as [`extend`](Self::extend).
    pub fn concat<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.extend(other)
    }

    pub fn pop(&mut self, index: Option<isize>) -> Result<T> {
        let position = self.resolve(index.unwrap_or(-1))?;
        self.announce_removed([position]);
        let value = self.items.remove(position);
        self.commit(ChangeKind::Removed)?;
        Ok(value)
    }

    pub fn delete(&mut self, index: isize) -> Result<()> {
        self.pop(Some(index)).map(|_| ())
    }

    /// Removes the first element equal to `value`.
    pub fn remove(&mut self, value: &T) -> Result<T>
    where
        T: PartialEq,
    {
        let position = self.index_of(value).ok_or(StoreError::ValueNotFound)?;
        self.announce_removed([position]);
        let removed = self.items.remove(position);
        self.commit(ChangeKind::Removed)?;
        Ok(removed)
    }

    /// Deletes every selected element and returns how many were removed.
    pub fn delete_slice(&mut self, slice: impl Into<Slice>) -> Result<usize> {
        let selection = slice.into().select(self.items.len())?;
        if selection.is_empty() {
            return Ok(0);
        }

        let descending = selection.descending();
        self.announce_removed(descending.iter().copied());
        match selection {
            Selection::Contiguous(range) => drop(self.items.drain(range)),
            Selection::Stepped(_) => {
                for position in &descending {
                    self.items.remove(*position);
                }
            }
        }

        self.commit(ChangeKind::Removed)?;
        Ok(descending.len())
    }

    pub fn clear(&mut self) -> Result<()> {
        let len = self.items.len();
        if len == 0 {
            return Ok(());
        }
        self.announce_removed((0..len).rev());
        self.items.clear();
        self.commit(ChangeKind::Removed)
    }

    /// Replaces the element at `index`, returning the previous value.
    ///
    /// Reported as a removal phase followed by an addition phase, even when
    /// the new value equals the old one.
    pub fn set(&mut self, index: isize, value: T) -> Result<T> {
        let position = self.resolve(index)?;
        self.announce_removed([position]);
        let previous = std::mem::replace(&mut self.items[position], value);
        let removed = self.commit(ChangeKind::Removed);

        self.announce_added(position..position + 1);
        let added = self.commit(ChangeKind::Added);
        removed.and(added)?;
        Ok(previous)
    }

    /// Replaces the selected elements with `values`.
    ///
    /// A contiguous selection may change length. A stepped selection must
    /// receive exactly as many values as it selects; a mismatch is rejected
    /// before anything is touched. The removal phase and the addition phase
    /// each close with their own aggregate event, and an empty phase is
    /// silent. When both phases fail, the first error is returned.
    pub fn assign_slice<I>(&mut self, slice: impl Into<Slice>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let selection = slice.into().select(self.items.len())?;
        let values: Vec<T> = values.into_iter().collect();

        match selection {
            Selection::Contiguous(range) => {
                let start = range.start;
                let removed_count = range.len();
                let added_count = values.len();

                self.announce_removed(range.clone().rev());
                drop(self.items.splice(range, values));

                let mut outcome = Ok(());
                if removed_count > 0 {
                    outcome = self.commit(ChangeKind::Removed);
                }
                if added_count > 0 {
                    self.announce_added(start..start + added_count);
                    let added = self.commit(ChangeKind::Added);
                    outcome = outcome.and(added);
                }
                outcome
            }
            Selection::Stepped(positions) => {
                if positions.len() != values.len() {
                    return Err(StoreError::InvalidSlice(format!(
                        "attempt to assign sequence of size {} to extended slice of size {}",
                        values.len(),
                        positions.len()
                    )));
                }
                if positions.is_empty() {
                    return Ok(());
                }

                let mut descending = positions.clone();
                descending.sort_unstable_by(|a, b| b.cmp(a));

                self.announce_removed(descending.iter().copied());
                for (position, value) in positions.iter().zip(values) {
                    self.items[*position] = value;
                }
                let removed = self.commit(ChangeKind::Removed);

                self.announce_added(descending.iter().rev().copied());
                let added = self.commit(ChangeKind::Added);
                removed.and(added)
            }
        }
    }

    /// In-place repetition. `times <= 0` empties the sequence; `times > 0`
    /// appends `times - 1` copies of the current contents.
    pub fn replicate(&mut self, times: isize) -> Result<()>
    where
        T: Clone,
    {
        if times <= 0 {
            return self.clear();
        }

        let len = self.items.len();
        if len == 0 || times == 1 {
            return Ok(());
        }

        let additional = len.checked_mul(times as usize - 1).ok_or_else(|| {
            StoreError::CapacityExceeded(format!(
                "replicating {} items {} times overflows",
                len, times
            ))
        })?;
        self.items
            .try_reserve(additional)
            .map_err(|e| StoreError::CapacityExceeded(e.to_string()))?;
        for _ in 1..times {
            self.items.extend_from_within(..len);
        }
        let end = self.items.len();
        self.announce_added(len..end);
        self.commit(ChangeKind::Added)
    }

    fn announce_added(&mut self, positions: impl IntoIterator<Item = usize>) {
        for index in positions {
            self.observer.notify_add_one(index, &self.items[index]);
        }
    }

    fn announce_removed(&mut self, positions: impl IntoIterator<Item = usize>) {
        for index in positions {
            self.observer.notify_remove_one(index, &self.items[index]);
        }
    }

    /// Hooks run first, then the observer sees the settled contents.
    fn commit(&mut self, kind: ChangeKind) -> Result<()> {
        self.hooks.dispatch();
        self.observer.notify_changed(kind, &self.items)
    }
}

impl<T, O> Deref for ObservableList<T, O> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T: fmt::Debug, O> fmt::Debug for ObservableList<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObservableList(")?;
        f.debug_list().entries(&self.items).finish()?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::hooks::hook;
    use crate::observable::observer::{EventLog, ListEvent};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn logged<T: Clone>(items: Vec<T>) -> ObservableList<T, EventLog<T>> {
        ObservableList::with_observer(items, EventLog::new())
    }

    fn counting_hook(list: &mut ObservableList<i32, EventLog<i32>>) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        list.on_change(hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
        calls
    }

    #[test]
    fn test_append_emits_add_at_end() {
        let mut list = logged(vec![1, 2, 3]);
        list.append(4).unwrap();

        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(
            list.observer().events(),
            &[
                ListEvent::Added { index: 3, value: 4 },
                ListEvent::Changed(ChangeKind::Added),
            ]
        );
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut list = logged(vec![1, 2, 4]);
        list.insert(2, 3).unwrap();

        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(list.observer().added_indices(), vec![2]);
    }

    #[test]
    fn test_insert_clamps_and_resolves_negative() {
        let mut list = logged(vec![1, 2, 3]);
        list.insert(-1, 9).unwrap();
        list.insert(100, 10).unwrap();
        list.insert(-100, 0).unwrap();

        assert_eq!(list.as_slice(), &[0, 1, 2, 9, 3, 10]);
        assert_eq!(list.observer().added_indices(), vec![2, 4, 0]);
    }

    #[test]
    fn test_extend_ascending_and_empty_is_silent() {
        let mut list = logged(vec![1]);
        let calls = counting_hook(&mut list);

        list.extend(vec![2, 3]).unwrap();
        list.extend(Vec::new()).unwrap();

        assert_eq!(list.observer().added_indices(), vec![1, 2]);
        assert_eq!(list.observer().aggregate_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delete_slice_removes_descending() {
        let mut list = logged(vec![0, 1, 2, 3, 4]);
        let removed = list.delete_slice(Slice::new(1, 4)).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(list.as_slice(), &[0, 4]);
        assert_eq!(list.observer().removed_indices(), vec![3, 2, 1]);
        assert_eq!(
            list.observer().events().last(),
            Some(&ListEvent::Changed(ChangeKind::Removed))
        );
    }

    #[test]
    fn test_delete_stepped_slice() {
        let mut list = logged(vec![0, 1, 2, 3, 4, 5]);
        list.delete_slice(Slice::full().step(2)).unwrap();

        assert_eq!(list.as_slice(), &[1, 3, 5]);
        assert_eq!(list.observer().removed_indices(), vec![4, 2, 0]);
    }

    #[test]
    fn test_delete_empty_slice_is_silent() {
        let mut list = logged(vec![1, 2]);
        assert_eq!(list.delete_slice(Slice::new(1, 1)).unwrap(), 0);
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_delete_index_negative() {
        let mut list = logged(vec![1, 2, 3]);
        list.delete(-1).unwrap();

        assert_eq!(list.as_slice(), &[1, 2]);
        assert_eq!(
            list.observer().events()[0],
            ListEvent::Removed { index: 2, value: 3 }
        );
    }

    #[test]
    fn test_out_of_range_fails_before_events() {
        let mut list = logged(vec![1, 2, 3]);

        let err = list.delete(3).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 3 }));
        assert!(list.pop(Some(-4)).is_err());
        assert!(list.set(5, 0).is_err());

        assert_eq!(list.as_slice(), &[1, 2, 3]);
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_pop_default_and_index() {
        let mut list = logged(vec![1, 2, 3]);
        assert_eq!(list.pop(None).unwrap(), 3);
        assert_eq!(list.pop(Some(0)).unwrap(), 1);

        assert_eq!(list.as_slice(), &[2]);
        assert_eq!(list.observer().removed_indices(), vec![2, 0]);

        let mut empty: ObservableList<i32, EventLog<i32>> = logged(Vec::new());
        assert!(matches!(
            empty.pop(None),
            Err(StoreError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn test_remove_first_match() {
        let mut list = logged(vec![1, 2, 1]);
        assert_eq!(list.remove(&1).unwrap(), 1);

        assert_eq!(list.as_slice(), &[2, 1]);
        assert_eq!(list.observer().removed_indices(), vec![0]);
        assert!(matches!(list.remove(&7), Err(StoreError::ValueNotFound)));
    }

    #[test]
    fn test_clear_descending_once() {
        let mut list = logged(vec![1, 2, 3]);
        list.clear().unwrap();
        list.clear().unwrap();

        assert!(list.is_empty());
        assert_eq!(list.observer().removed_indices(), vec![2, 1, 0]);
        assert_eq!(list.observer().aggregate_count(), 1);
    }

    #[test]
    fn test_assign_slice_remove_then_add() {
        let mut list = logged(vec![0, 1, 2, 3]);
        list.assign_slice(Slice::new(1, 3), vec![7, 8, 9]).unwrap();

        assert_eq!(list.as_slice(), &[0, 7, 8, 9, 3]);
        assert_eq!(
            list.observer().events(),
            &[
                ListEvent::Removed { index: 2, value: 2 },
                ListEvent::Removed { index: 1, value: 1 },
                ListEvent::Changed(ChangeKind::Removed),
                ListEvent::Added { index: 1, value: 7 },
                ListEvent::Added { index: 2, value: 8 },
                ListEvent::Added { index: 3, value: 9 },
                ListEvent::Changed(ChangeKind::Added),
            ]
        );
    }

    #[test]
    fn test_assign_empty_into_empty_is_silent() {
        let mut list: ObservableList<i32, EventLog<i32>> = logged(Vec::new());
        let calls = counting_hook(&mut list);

        list.assign_slice(Slice::full(), Vec::new()).unwrap();

        assert!(list.observer().events().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_assign_slice_pure_insertion() {
        let mut list = logged(vec![1, 4]);
        list.assign_slice(Slice::new(1, 1), vec![2, 3]).unwrap();

        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(list.observer().aggregate_count(), 1);
        assert!(list.observer().removed_indices().is_empty());
    }

    #[test]
    fn test_assign_stepped_slice() {
        let mut list = logged(vec![0, 1, 2, 3]);
        list.assign_slice(Slice::full().step(-2), vec![30, 10]).unwrap();

        assert_eq!(list.as_slice(), &[0, 10, 2, 30]);
        assert_eq!(list.observer().removed_indices(), vec![3, 1]);
        assert_eq!(list.observer().added_indices(), vec![1, 3]);
    }

    #[test]
    fn test_assign_stepped_size_mismatch() {
        let mut list = logged(vec![0, 1, 2, 3]);
        let err = list
            .assign_slice(Slice::full().step(2), vec![1])
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidSlice(_)));
        assert_eq!(list.as_slice(), &[0, 1, 2, 3]);
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_set_replaces_identical_value_as_remove_and_add() {
        let mut list = logged(vec![5, 6]);
        assert_eq!(list.set(-1, 6).unwrap(), 6);

        assert_eq!(list.observer().removed_indices(), vec![1]);
        assert_eq!(list.observer().added_indices(), vec![1]);
        assert_eq!(list.observer().aggregate_count(), 2);
    }

    #[test]
    fn test_replicate_appends_copies() {
        let mut list = logged(vec!["a"]);
        list.replicate(3).unwrap();

        assert_eq!(list.as_slice(), &["a", "a", "a"]);
        assert_eq!(list.observer().added_indices(), vec![1, 2]);
        assert_eq!(list.observer().aggregate_count(), 1);
    }

    #[test]
    fn test_replicate_non_positive_clears() {
        let mut list = logged(vec![1, 2]);
        list.replicate(0).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.observer().removed_indices(), vec![1, 0]);

        list.replicate(-1).unwrap();
        assert_eq!(list.observer().aggregate_count(), 1);
    }

    #[test]
    fn test_replicate_too_large_fails_without_events() {
        let mut list = logged(vec![1, 2]);
        let err = list.replicate(isize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded(_)));

        let mut list_of_three = logged(vec![1, 2, 3]);
        let err = list_of_three.replicate(isize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded(_)));

        assert_eq!(list.as_slice(), &[1, 2]);
        assert!(list.observer().events().is_empty());
        assert_eq!(list_of_three.as_slice(), &[1, 2, 3]);
        assert!(list_of_three.observer().events().is_empty());
    }

    #[test]
    fn test_replicate_once_is_silent() {
        let mut list = logged(vec![1, 2]);
        list.replicate(1).unwrap();
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_concat_matches_extend() {
        let mut list = logged(vec![1]);
        list.concat([2, 3]).unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3]);
        assert_eq!(list.observer().added_indices(), vec![1, 2]);
    }

    #[test]
    fn test_unsupported_operations() {
        let mut list = logged(vec![3, 1, 2]);
        assert!(matches!(
            list.reverse(),
            Err(StoreError::UnsupportedOperation(_))
        ));
        assert!(matches!(list.sort(), Err(StoreError::UnsupportedOperation(_))));
        assert_eq!(list.as_slice(), &[3, 1, 2]);
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_hooks_run_once_per_aggregate() {
        let mut list = logged(vec![1, 2, 3]);
        let calls = counting_hook(&mut list);

        list.append(4).unwrap();
        list.delete_slice(Slice::new(0, 2)).unwrap();
        list.assign_slice(Slice::new(0, 1), vec![9]).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_read_operations_are_silent() {
        let list = logged(vec![1, 2, 2, 3]);

        assert_eq!(list.len(), 4);
        assert_eq!(list.count(&2), 2);
        assert_eq!(list.index_of(&3), Some(3));
        assert_eq!(list.at(-1), Some(&3));
        assert_eq!(list.at(4), None);
        assert!(list.contains(&1));
        assert!(list.observer().events().is_empty());
    }

    #[test]
    fn test_debug_format() {
        let list = ObservableList::from_vec(vec![1, 2]);
        assert_eq!(format!("{:?}", list), "ObservableList([1, 2])");
    }

    struct FailingObserver;

    impl ListObserver<i32> for FailingObserver {
        fn notify_changed(&mut self, _kind: ChangeKind, _contents: &[i32]) -> Result<()> {
            Err(StoreError::StorageWrite("disk full".to_string()))
        }
    }

    #[test]
    fn test_observer_error_propagates_without_rollback() {
        let mut list = ObservableList::with_observer(vec![1], FailingObserver);
        let err = list.append(2).unwrap_err();

        assert!(matches!(err, StoreError::StorageWrite(_)));
        assert_eq!(list.as_slice(), &[1, 2]);
    }
}
