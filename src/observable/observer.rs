use crate::core::Result;

/// Which phase of a mutation an aggregate event closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Receives the element-level and aggregate events of an [`ObservableList`].
///
/// Element events carry the resolved, non-negative position of the element.
/// Removals are reported before the element leaves the sequence, additions
/// after it has been placed. `notify_changed` closes a phase and gets the
/// full contents as they stand after the whole operation.
///
/// [`ObservableList`]: super::ObservableList
pub trait ListObserver<T> {
    fn notify_add_one(&mut self, _index: usize, _value: &T) {}

    fn notify_remove_one(&mut self, _index: usize, _value: &T) {}

    fn notify_changed(&mut self, _kind: ChangeKind, _contents: &[T]) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<T> ListObserver<T> for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<T> {
    Added { index: usize, value: T },
    Removed { index: usize, value: T },
    Changed(ChangeKind),
}

/// Records every event it sees, in emission order.
#[derive(Debug, Clone)]
pub struct EventLog<T> {
    events: Vec<ListEvent<T>>,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ListEvent<T>] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<ListEvent<T>> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Indices of the removal events, in emission order.
    pub fn removed_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ListEvent::Removed { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Indices of the addition events, in emission order.
    pub fn added_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ListEvent::Added { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn aggregate_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ListEvent::Changed(_)))
            .count()
    }
}

impl<T: Clone> ListObserver<T> for EventLog<T> {
    fn notify_add_one(&mut self, index: usize, value: &T) {
        self.events.push(ListEvent::Added {
            index,
            value: value.clone(),
        });
    }

    fn notify_remove_one(&mut self, index: usize, value: &T) {
        self.events.push(ListEvent::Removed {
            index,
            value: value.clone(),
        });
    }

    fn notify_changed(&mut self, kind: ChangeKind, _contents: &[T]) -> Result<()> {
        self.events.push(ListEvent::Changed(kind));
        Ok(())
    }
}
