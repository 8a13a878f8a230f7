//! Theme activation service.
//!
//! Listens to component activation events in the "themes" area and to the
//! desktop bridge's update observers, mounting one stylesheet link per
//! active theme (keyed by component uuid) into the document head.

pub mod activator;
pub mod dom;

// Re-export commonly used types
pub use activator::{ActivationHandler, ComponentRegistry, ThemeActivator};
pub use dom::StylesheetDom;
#[cfg(target_arch = "wasm32")]
pub use dom::DocumentHead;
