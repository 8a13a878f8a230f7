//! Tauri-backed desktop host wiring (wasm side).
//!
//! Outbound capability calls go through `window.__TAURI__.core.invoke`;
//! inbound install completions arrive as `desktop-component-installed`
//! CustomEvents emitted by the shell.

use std::rc::Rc;

use component_model::{ComponentTransmission, InstalledComponent};
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::bridge::{DesktopBridge, DesktopHost};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"])]
    fn invoke(cmd: &str, args: JsValue) -> Promise;
}

/// Fire a command and log its failure; callers never wait on the shell.
fn invoke_with<T: Serialize>(cmd: &'static str, args: &T) {
    let args = match serde_wasm_bindgen::to_value(args) {
        Ok(args) => args,
        Err(e) => {
            log::error!("failed to serialize args for {}: {}", cmd, e);
            return;
        }
    };
    let promise = invoke(cmd, args);
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::error!("{} failed: {:?}", cmd, e);
        }
    });
}

/// Desktop host reached through Tauri commands.
pub struct TauriHost;

impl DesktopHost for TauriHost {
    fn sync_component_installation(&self, components: Vec<ComponentTransmission>) {
        #[derive(Serialize)]
        struct Args {
            components: Vec<ComponentTransmission>,
        }
        invoke_with("sync_component_installation", &Args { components });
    }

    fn install_component(&self, component: ComponentTransmission) {
        #[derive(Serialize)]
        struct Args {
            component: ComponentTransmission,
        }
        invoke_with("install_component", &Args { component });
    }

    fn initial_data_loaded(&self) {
        invoke_with("initial_data_loaded", &());
    }

    fn major_data_change(&self) {
        invoke_with("major_data_change", &());
    }
}

#[derive(Deserialize)]
struct InstallEventDetail {
    component: InstalledComponent,
    #[serde(default)]
    error: Option<String>,
}

/// Subscribe to install-completion events emitted by the shell and feed
/// them into the bridge. The listener lives for the page's lifetime.
pub fn listen_for_install_events(bridge: Rc<DesktopBridge>) {
    let Some(window) = web_sys::window() else {
        log::error!("no window object, install events will not be delivered");
        return;
    };

    let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some(custom) = event.dyn_ref::<web_sys::CustomEvent>() else {
            return;
        };
        match serde_wasm_bindgen::from_value::<InstallEventDetail>(custom.detail()) {
            Ok(detail) => {
                bridge.on_component_installation_complete(detail.component, detail.error);
            }
            Err(e) => log::error!("malformed install event detail: {}", e),
        }
    }) as Box<dyn FnMut(_)>);

    if let Err(e) = window.add_event_listener_with_callback(
        "desktop-component-installed",
        closure.as_ref().unchecked_ref(),
    ) {
        log::error!("failed to register install event listener: {:?}", e);
    }
    closure.forget();
}
