pub mod codec;
pub mod config;
pub mod engine;
pub mod memory;
pub mod persistence;

pub use codec::{Codec, Format};
pub use config::{DurabilityMode, StoreConfig};
pub use engine::BackingStore;
pub use memory::MemoryStore;
pub use persistence::FileStore;
