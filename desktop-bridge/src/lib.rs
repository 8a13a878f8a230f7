//! Bridge between the web application and an optional desktop shell.
//!
//! The shell supplies capabilities (component installation, backup file
//! handling) through the [`DesktopHost`] trait; the web side relays model
//! and sync events back out and fans component updates to registered
//! observers. Without an attached host every relay is a no-op.

pub mod bridge;
pub mod observers;
pub mod schedule;
#[cfg(target_arch = "wasm32")]
pub mod tauri_host;

// Re-export commonly used types
pub use bridge::{DesktopBridge, DesktopHost};
pub use observers::{ObserverToken, UpdateCallback};
pub use schedule::{Scheduler, Task};
#[cfg(target_arch = "wasm32")]
pub use schedule::WindowScheduler;
#[cfg(target_arch = "wasm32")]
pub use tauri_host::{listen_for_install_events, TauriHost};
