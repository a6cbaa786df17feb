//! Write-through persistence for observable sequences.

pub mod stored_list;
pub mod sync;

pub use stored_list::StoredList;
pub use sync::StoreSync;
