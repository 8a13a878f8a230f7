//! Shared component data model for the note app's extension system.
//!
//! Components are installable extensions (themes, editors). This crate
//! holds the component record itself, the wire shapes exchanged with the
//! desktop shell, and the seams to the model/sync/auth subsystems that
//! own everything else.

pub mod collaborators;
pub mod component;
pub mod transmission;

// Re-export commonly used types
pub use collaborators::{
    ChangeSource, ModelStore, PasscodeStore, SessionAuth, SharedComponent, SyncService,
};
pub use component::{Component, ComponentArea};
pub use transmission::{ComponentTransmission, InstalledComponent, InstalledContent, TransmissionContent};
