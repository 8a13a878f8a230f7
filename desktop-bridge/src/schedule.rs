//! Deferred execution seam.
//!
//! The bridge and the theme activator only ever need "run this later":
//! next tick for the observer fan-out, a fixed delay for theme reloads.
//! Both are fire-and-forget, no cancellation.

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` on the next scheduling tick.
    fn defer(&self, task: Task);

    /// Run `task` after roughly `ms` milliseconds.
    fn delay(&self, ms: u32, task: Task);
}

#[cfg(target_arch = "wasm32")]
mod window {
    use super::{Scheduler, Task};

    use wasm_bindgen::prelude::Closure;
    use wasm_bindgen::JsCast;

    /// `window.setTimeout`-backed scheduler.
    pub struct WindowScheduler;

    impl WindowScheduler {
        fn schedule(ms: i32, task: Task) {
            let Some(window) = web_sys::window() else {
                log::error!("no window object, dropping scheduled task");
                return;
            };
            let callback = Closure::once(move || task());
            if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms,
            ) {
                log::error!("setTimeout failed: {:?}", e);
            }
            callback.forget();
        }
    }

    impl Scheduler for WindowScheduler {
        fn defer(&self, task: Task) {
            Self::schedule(0, task);
        }

        fn delay(&self, ms: u32, task: Task) {
            Self::schedule(ms as i32, task);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use window::WindowScheduler;
