use crate::core::{Result, StoreError};
use std::fmt;
use std::sync::Arc;

/// Argument-less callback run once per aggregate change.
pub type ChangeHook = Arc<dyn Fn() + Send + Sync>;

/// Wraps a closure into a [`ChangeHook`].
///
/// Hooks are compared by identity, so keep the returned handle around if the
/// hook needs to be removed later.
pub fn hook<F>(f: F) -> ChangeHook
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered set of change hooks, deduplicated by identity.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Vec<ChangeHook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` and hands it back, or fails if the same hook is
    /// already present.
    pub fn register(&mut self, hook: ChangeHook) -> Result<ChangeHook> {
        if self.contains(&hook) {
            return Err(StoreError::DuplicateHook);
        }
        self.hooks.push(hook.clone());
        Ok(hook)
    }

    /// Removes `hook`; returns `false` when it was not registered.
    pub fn unregister(&mut self, hook: &ChangeHook) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|registered| !same_hook(registered, hook));
        self.hooks.len() != before
    }

    pub fn contains(&self, hook: &ChangeHook) -> bool {
        self.hooks.iter().any(|registered| same_hook(registered, hook))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook in registration order.
    pub fn dispatch(&self) {
        for hook in &self.hooks {
            hook();
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

// Compare data pointers only; vtable addresses are not stable across codegen units.
fn same_hook(a: &ChangeHook, b: &ChangeHook) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
