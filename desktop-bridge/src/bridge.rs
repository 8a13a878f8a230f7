//! The bridge itself: host capabilities in, model/sync events out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use component_model::{
    ChangeSource, ComponentTransmission, InstalledComponent, ModelStore, PasscodeStore,
    SessionAuth, SharedComponent, SyncService,
};
use serde_json::{json, Value};

use crate::observers::{ObserverRegistry, ObserverToken, UpdateCallback};
use crate::schedule::Scheduler;

/// Source tag handed to the sync engine after an install completes.
const INSTALLATION_SYNC_SOURCE: &str = "component-installation-complete";

/// Capabilities the desktop shell offers the web application.
///
/// One implementation per shell flavor; the bridge holds at most one.
pub trait DesktopHost {
    /// Receive the full set of installed components for reconciliation.
    fn sync_component_installation(&self, components: Vec<ComponentTransmission>);

    /// Install or update a single component.
    fn install_component(&self, component: ComponentTransmission);

    /// The web application finished loading its initial data.
    fn initial_data_loaded(&self) {}

    /// A wholesale data change happened (import, account switch).
    fn major_data_change(&self) {}
}

pub struct DesktopBridge {
    model: Rc<dyn ModelStore>,
    sync: Rc<dyn SyncService>,
    session: Rc<dyn SessionAuth>,
    passcode: Rc<dyn PasscodeStore>,
    scheduler: Rc<dyn Scheduler>,
    host: RefCell<Option<Rc<dyn DesktopHost>>>,
    observers: RefCell<ObserverRegistry>,
    data_loaded: Cell<bool>,
    application_data_path: RefCell<Option<String>>,
}

impl DesktopBridge {
    pub fn new(
        model: Rc<dyn ModelStore>,
        sync: Rc<dyn SyncService>,
        session: Rc<dyn SessionAuth>,
        passcode: Rc<dyn PasscodeStore>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            model,
            sync,
            session,
            passcode,
            scheduler,
            host: RefCell::new(None),
            observers: RefCell::new(ObserverRegistry::new()),
            data_loaded: Cell::new(false),
            application_data_path: RefCell::new(None),
        }
    }

    /// Attach the desktop shell. If the initial data load already
    /// happened the host is told right away, so a late-attaching shell
    /// never misses it.
    pub fn attach_host(&self, host: Rc<dyn DesktopHost>) {
        if self.data_loaded.get() {
            host.initial_data_loaded();
        }
        *self.host.borrow_mut() = Some(host);
    }

    pub fn has_host(&self) -> bool {
        self.host.borrow().is_some()
    }

    fn host(&self) -> Option<Rc<dyn DesktopHost>> {
        self.host.borrow().clone()
    }

    /// Hand the shell every installed component for reconciliation.
    /// No-op when not running inside the desktop shell.
    pub fn sync_components_installation(&self, components: &[SharedComponent]) {
        let Some(host) = self.host() else {
            return;
        };
        let data = components
            .iter()
            .map(|component| ComponentTransmission::from_component(&component.borrow()))
            .collect();
        host.sync_component_installation(data);
    }

    /// Ask the shell to install a single component.
    pub fn install_component(&self, component: &SharedComponent) {
        let Some(host) = self.host() else {
            log::warn!(
                "install requested for {} without a desktop host",
                component.borrow().uuid
            );
            return;
        };
        host.install_component(ComponentTransmission::from_component(&component.borrow()));
    }

    pub fn register_update_observer(&self, callback: UpdateCallback) -> ObserverToken {
        self.observers.borrow_mut().register(callback)
    }

    pub fn deregister_update_observer(&self, token: &ObserverToken) -> bool {
        self.observers.borrow_mut().deregister(token)
    }

    /// The shell finished (or failed) installing a component.
    ///
    /// Unknown components are logged and ignored. On failure the error is
    /// stored on the component itself; on success only `package_info` and
    /// `local_url` are written back and any stored error is cleared.
    /// Either way the component is dirtied, a sync is kicked off, and the
    /// update observers are notified on the next tick.
    pub fn on_component_installation_complete(
        &self,
        data: InstalledComponent,
        error: Option<String>,
    ) {
        log::info!(
            "component installation complete: {} (error: {:?})",
            data.uuid,
            error
        );

        let Some(component) = self.model.find_component(&data.uuid) else {
            log::error!("installation completed for unknown component {}", data.uuid);
            return;
        };

        match error {
            Some(message) => {
                component.borrow_mut().set_install_error(Some(message));
            }
            None => {
                component.borrow_mut().apply_installed_fields(data.content);
                self.model.notify_components_changed(
                    std::slice::from_ref(&component),
                    ChangeSource::DesktopInstalled,
                );
                component.borrow_mut().set_install_error(None);
            }
        }

        component.borrow_mut().dirty = true;
        self.sync.sync(INSTALLATION_SYNC_SOURCE);

        let callbacks = self.observers.borrow().callbacks();
        let updated = component.clone();
        self.scheduler.defer(Box::new(move || {
            for callback in &callbacks {
                callback(updated.clone());
            }
        }));
    }

    /// Assemble a full backup document for the shell to write to disk.
    ///
    /// Credentials come from the local passcode when running offline with
    /// one set, otherwise from the authenticated session. `None` when
    /// there is nothing to export.
    pub fn request_backup_file(&self) -> Option<String> {
        let (keys, auth_params, version) =
            if self.session.is_offline() && self.passcode.has_passcode() {
                let auth_params = self.passcode.auth_params();
                let version = auth_params
                    .as_ref()
                    .and_then(|params| params.get("version"))
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                (self.passcode.keys(), auth_params, version)
            } else {
                (
                    self.session.keys(),
                    self.session.auth_params(),
                    self.session.protocol_version(),
                )
            };

        let items = self.model.export_items(keys.as_ref());
        if items.is_empty() {
            return None;
        }

        let backup = json!({
            "items": items,
            "auth_params": auth_params,
            "version": version,
        });
        Some(backup.to_string())
    }

    /// Shell-provided filesystem root used to resolve component-local
    /// resource URLs.
    pub fn set_application_data_path(&self, path: impl Into<String>) {
        *self.application_data_path.borrow_mut() = Some(path.into());
    }

    pub fn application_data_path(&self) -> Option<String> {
        self.application_data_path.borrow().clone()
    }

    /// Called by the application once its initial data load finished.
    pub fn notify_initial_data_loaded(&self) {
        self.data_loaded.set(true);
        if let Some(host) = self.host() {
            host.initial_data_loaded();
        }
    }

    /// Called by the application after a wholesale data change.
    pub fn notify_major_data_change(&self) {
        if let Some(host) = self.host() {
            host.major_data_change();
        }
    }
}
