//! Ordered sequence with element-level and aggregate change notification.

pub mod hooks;
pub mod list;
pub mod observer;
pub mod slice;

pub use hooks::{ChangeHook, HookRegistry, hook};
pub use list::ObservableList;
pub use observer::{ChangeKind, EventLog, ListEvent, ListObserver, NoopObserver};
pub use slice::{Selection, Slice};
