//! Update-observer registry.
//!
//! Observers are identified by a monotonically increasing integer token,
//! so tokens are unique for the lifetime of the registry and removal is
//! exact.

use std::rc::Rc;

use component_model::SharedComponent;

/// Callback invoked with a component after the desktop shell updated it.
pub type UpdateCallback = Rc<dyn Fn(SharedComponent)>;

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverToken(u64);

pub struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(u64, UpdateCallback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self { next_id: 1, entries: Vec::new() }
    }

    pub fn register(&mut self, callback: UpdateCallback) -> ObserverToken {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, callback));
        ObserverToken(id)
    }

    /// Remove the observer behind `token`. Returns whether it was present.
    pub fn deregister(&mut self, token: &ObserverToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != token.0);
        self.entries.len() != before
    }

    /// Snapshot of the registered callbacks, in registration order.
    pub fn callbacks(&self) -> Vec<UpdateCallback> {
        self.entries.iter().map(|(_, callback)| callback.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
