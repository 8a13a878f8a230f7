//! Seams to the model, sync, and credential subsystems.
//!
//! These subsystems live elsewhere in the application; the bridge and the
//! theme activator only ever call through these traits. Everything here is
//! single-threaded (`Rc`/`RefCell`), matching the callback-driven frontend.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::component::Component;

/// A component as handed out by the model layer.
pub type SharedComponent = Rc<RefCell<Component>>;

/// Why the model layer is being told a component changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Fields written back by the desktop shell after an install.
    DesktopInstalled,
}

/// The item/model manager.
pub trait ModelStore {
    fn find_component(&self, uuid: &str) -> Option<SharedComponent>;

    /// Tell sync observers that these components changed outside of a
    /// normal mapping pass.
    fn notify_components_changed(&self, components: &[SharedComponent], source: ChangeSource);

    /// Export every item, encrypted with `keys` when given. Empty when
    /// there is nothing to export.
    fn export_items(&self, keys: Option<&Value>) -> Vec<Value>;
}

/// The sync engine. `source` names the operation that asked for the sync.
pub trait SyncService {
    fn sync(&self, source: &str);
}

/// The authenticated-session credential source.
pub trait SessionAuth {
    fn is_offline(&self) -> bool;
    fn keys(&self) -> Option<Value>;
    fn auth_params(&self) -> Option<Value>;
    fn protocol_version(&self) -> Option<String>;
}

/// The local-passcode credential source, used when no account session
/// exists. Its protocol version lives inside the auth params.
pub trait PasscodeStore {
    fn has_passcode(&self) -> bool;
    fn keys(&self) -> Option<Value>;
    fn auth_params(&self) -> Option<Value>;
}
