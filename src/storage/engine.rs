use crate::core::Result;

/// Durable medium holding one serialized snapshot - allows pluggable backends
pub trait BackingStore {
    /// Read the whole stored snapshot. An empty buffer means "nothing stored".
    fn read(&self) -> Result<Vec<u8>>;

    /// Replace the stored snapshot with `bytes`
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Human-readable location, used in logs and error messages
    fn location(&self) -> String;

    /// False when writes are accepted but never reach the medium
    fn is_durable(&self) -> bool {
        true
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn read(&self) -> Result<Vec<u8>> {
        (**self).read()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn is_durable(&self) -> bool {
        (**self).is_durable()
    }
}
