//! Activation wiring and the activate/deactivate operations.

use std::rc::Rc;

use component_model::{Component, ComponentArea, SharedComponent};
use desktop_bridge::{DesktopBridge, Scheduler};

use crate::dom::StylesheetDom;

/// Delay before re-adding a reloaded theme's stylesheet, so the browser
/// fetches the resource again instead of reviving the detached element.
const RELOAD_DELAY_MS: u32 = 10;

/// Callback the component registry invokes when a component's activation
/// state flips.
pub type ActivationHandler = Rc<dyn Fn(SharedComponent)>;

/// Component-manager seam: activation events plus resource URL resolution.
pub trait ComponentRegistry {
    fn register_activation_handler(&self, area: ComponentArea, handler: ActivationHandler);

    fn url_for_component(&self, component: &Component) -> Option<String>;
}

pub struct ThemeActivator {
    registry: Rc<dyn ComponentRegistry>,
    dom: Rc<dyn StylesheetDom>,
    scheduler: Rc<dyn Scheduler>,
}

impl ThemeActivator {
    /// Wire a new activator into the component registry and the bridge.
    pub fn start(
        registry: Rc<dyn ComponentRegistry>,
        dom: Rc<dyn StylesheetDom>,
        scheduler: Rc<dyn Scheduler>,
        bridge: &DesktopBridge,
    ) -> Rc<Self> {
        let activator = Rc::new(Self {
            registry: registry.clone(),
            dom,
            scheduler,
        });

        let on_activation = activator.clone();
        registry.register_activation_handler(
            ComponentArea::Themes,
            Rc::new(move |component: SharedComponent| {
                let component = component.borrow();
                if component.active {
                    on_activation.activate_theme(&component);
                } else {
                    on_activation.deactivate_theme(&component);
                }
            }),
        );

        let on_update = activator.clone();
        let _ = bridge.register_update_observer(Rc::new(move |component: SharedComponent| {
            let needs_reload = {
                let component = component.borrow();
                component.active && component.is_theme()
            };
            if needs_reload {
                on_update.clone().reload_theme(component);
            }
        }));

        activator
    }

    /// Mount the theme's stylesheet. Exactly one link per theme uuid; an
    /// already-mounted link is replaced rather than stacked.
    pub fn activate_theme(&self, theme: &Component) {
        let Some(url) = self.registry.url_for_component(theme) else {
            log::warn!("no resource url for theme {}, skipping activation", theme.uuid);
            return;
        };
        self.dom.remove_link(&theme.uuid);
        self.dom.append_link(&theme.uuid, &url);
    }

    pub fn deactivate_theme(&self, theme: &Component) {
        self.dom.remove_link(&theme.uuid);
    }

    /// A theme changed remotely; drop its stylesheet and mount it again
    /// shortly after so the resource is fetched fresh.
    fn reload_theme(self: Rc<Self>, theme: SharedComponent) {
        self.deactivate_theme(&theme.borrow());
        let activator = self.clone();
        self.scheduler.delay(
            RELOAD_DELAY_MS,
            Box::new(move || {
                activator.activate_theme(&theme.borrow());
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashMap;

    use component_model::{
        ChangeSource, InstalledComponent, InstalledContent, ModelStore, PasscodeStore,
        SessionAuth, SyncService,
    };
    use desktop_bridge::Task;
    use serde_json::Value;

    #[derive(Default)]
    struct ManualScheduler {
        deferred: RefCell<Vec<Task>>,
        delayed: RefCell<Vec<(u32, Task)>>,
    }

    impl ManualScheduler {
        fn run_deferred(&self) {
            let tasks: Vec<Task> = self.deferred.borrow_mut().drain(..).collect();
            for task in tasks {
                task();
            }
        }

        fn run_delayed(&self) -> Vec<u32> {
            let tasks: Vec<(u32, Task)> = self.delayed.borrow_mut().drain(..).collect();
            let mut delays = Vec::new();
            for (ms, task) in tasks {
                delays.push(ms);
                task();
            }
            delays
        }
    }

    impl Scheduler for ManualScheduler {
        fn defer(&self, task: Task) {
            self.deferred.borrow_mut().push(task);
        }

        fn delay(&self, ms: u32, task: Task) {
            self.delayed.borrow_mut().push((ms, task));
        }
    }

    #[derive(Default)]
    struct FakeDom {
        links: RefCell<Vec<(String, String)>>,
    }

    impl FakeDom {
        fn count(&self, id: &str) -> usize {
            self.links.borrow().iter().filter(|(i, _)| i == id).count()
        }

        fn href(&self, id: &str) -> Option<String> {
            self.links
                .borrow()
                .iter()
                .find(|(i, _)| i == id)
                .map(|(_, href)| href.clone())
        }
    }

    impl StylesheetDom for FakeDom {
        fn append_link(&self, id: &str, href: &str) {
            self.links.borrow_mut().push((id.to_string(), href.to_string()));
        }

        fn remove_link(&self, id: &str) -> bool {
            let mut links = self.links.borrow_mut();
            let before = links.len();
            links.retain(|(i, _)| i != id);
            links.len() != before
        }

        fn has_link(&self, id: &str) -> bool {
            self.links.borrow().iter().any(|(i, _)| i == id)
        }
    }

    #[derive(Default)]
    struct FakeRegistry {
        handlers: RefCell<Vec<(ComponentArea, ActivationHandler)>>,
        urls: RefCell<HashMap<String, String>>,
    }

    impl FakeRegistry {
        fn set_url(&self, uuid: &str, url: &str) {
            self.urls.borrow_mut().insert(uuid.to_string(), url.to_string());
        }

        fn fire(&self, area: ComponentArea, component: &SharedComponent) {
            let handlers: Vec<ActivationHandler> = self
                .handlers
                .borrow()
                .iter()
                .filter(|(registered, _)| *registered == area)
                .map(|(_, handler)| handler.clone())
                .collect();
            for handler in handlers {
                handler(component.clone());
            }
        }
    }

    impl ComponentRegistry for FakeRegistry {
        fn register_activation_handler(&self, area: ComponentArea, handler: ActivationHandler) {
            self.handlers.borrow_mut().push((area, handler));
        }

        fn url_for_component(&self, component: &Component) -> Option<String> {
            self.urls.borrow().get(&component.uuid).cloned()
        }
    }

    #[derive(Default)]
    struct TestModel {
        components: RefCell<HashMap<String, SharedComponent>>,
    }

    impl TestModel {
        fn insert(&self, component: Component) -> SharedComponent {
            let shared = Rc::new(RefCell::new(component));
            self.components
                .borrow_mut()
                .insert(shared.borrow().uuid.clone(), shared.clone());
            shared
        }
    }

    impl ModelStore for TestModel {
        fn find_component(&self, uuid: &str) -> Option<SharedComponent> {
            self.components.borrow().get(uuid).cloned()
        }

        fn notify_components_changed(&self, _: &[SharedComponent], _: ChangeSource) {}

        fn export_items(&self, _: Option<&Value>) -> Vec<Value> {
            Vec::new()
        }
    }

    struct NullSync;

    impl SyncService for NullSync {
        fn sync(&self, _: &str) {}
    }

    struct NullSession;

    impl SessionAuth for NullSession {
        fn is_offline(&self) -> bool {
            false
        }

        fn keys(&self) -> Option<Value> {
            None
        }

        fn auth_params(&self) -> Option<Value> {
            None
        }

        fn protocol_version(&self) -> Option<String> {
            None
        }
    }

    struct NullPasscode;

    impl PasscodeStore for NullPasscode {
        fn has_passcode(&self) -> bool {
            false
        }

        fn keys(&self) -> Option<Value> {
            None
        }

        fn auth_params(&self) -> Option<Value> {
            None
        }
    }

    struct Harness {
        model: Rc<TestModel>,
        registry: Rc<FakeRegistry>,
        dom: Rc<FakeDom>,
        scheduler: Rc<ManualScheduler>,
        bridge: DesktopBridge,
    }

    impl Harness {
        fn start_activator(&self) -> Rc<ThemeActivator> {
            ThemeActivator::start(
                self.registry.clone(),
                self.dom.clone(),
                self.scheduler.clone(),
                &self.bridge,
            )
        }
    }

    fn harness() -> Harness {
        let model = Rc::new(TestModel::default());
        let registry = Rc::new(FakeRegistry::default());
        let dom = Rc::new(FakeDom::default());
        let scheduler = Rc::new(ManualScheduler::default());
        let bridge = DesktopBridge::new(
            model.clone(),
            Rc::new(NullSync),
            Rc::new(NullSession),
            Rc::new(NullPasscode),
            scheduler.clone(),
        );
        Harness { model, registry, dom, scheduler, bridge }
    }

    fn theme(uuid: &str, active: bool) -> Component {
        let mut component = Component::new(uuid, uuid, ComponentArea::Themes);
        component.active = active;
        component
    }

    #[test]
    fn activation_mounts_exactly_one_link_per_theme() {
        let h = harness();
        h.registry.set_url("t-1", "https://extensions.example/midnight.css");
        let activator = h.start_activator();

        let shared = h.model.insert(theme("t-1", true));
        h.registry.fire(ComponentArea::Themes, &shared);
        assert_eq!(h.dom.count("t-1"), 1);
        assert_eq!(
            h.dom.href("t-1").as_deref(),
            Some("https://extensions.example/midnight.css")
        );

        // Activating again replaces the link instead of stacking a second.
        activator.activate_theme(&shared.borrow());
        assert_eq!(h.dom.count("t-1"), 1);
    }

    #[test]
    fn deactivation_removes_the_link() {
        let h = harness();
        h.registry.set_url("t-2", "https://extensions.example/solar.css");
        h.start_activator();

        let shared = h.model.insert(theme("t-2", true));
        h.registry.fire(ComponentArea::Themes, &shared);
        assert!(h.dom.has_link("t-2"));

        shared.borrow_mut().active = false;
        h.registry.fire(ComponentArea::Themes, &shared);
        assert!(!h.dom.has_link("t-2"));
    }

    #[test]
    fn deactivating_an_unmounted_theme_is_harmless() {
        let h = harness();
        let activator = h.start_activator();
        activator.deactivate_theme(&theme("t-3", false));
        assert!(h.dom.links.borrow().is_empty());
    }

    #[test]
    fn missing_resource_url_skips_activation() {
        let h = harness();
        h.start_activator();

        let shared = h.model.insert(theme("t-4", true));
        h.registry.fire(ComponentArea::Themes, &shared);
        assert!(!h.dom.has_link("t-4"));
    }

    #[test]
    fn remote_update_reloads_an_active_theme_after_the_delay() {
        let h = harness();
        h.registry.set_url("t-5", "https://extensions.example/dusk.css");
        h.start_activator();

        let shared = h.model.insert(theme("t-5", true));
        h.registry.fire(ComponentArea::Themes, &shared);
        assert!(h.dom.has_link("t-5"));

        h.bridge.on_component_installation_complete(
            InstalledComponent {
                uuid: "t-5".to_string(),
                content: InstalledContent::default(),
            },
            None,
        );

        // The observer fan-out runs on the next tick and drops the link.
        h.scheduler.run_deferred();
        assert!(!h.dom.has_link("t-5"));

        // The link comes back only once the reload delay fires.
        let delays = h.scheduler.run_delayed();
        assert_eq!(delays, vec![10]);
        assert_eq!(h.dom.count("t-5"), 1);
    }

    #[test]
    fn updates_to_inactive_or_non_theme_components_leave_the_dom_alone() {
        let h = harness();
        h.registry.set_url("t-6", "https://extensions.example/mono.css");
        h.start_activator();

        let inactive = h.model.insert(theme("t-6", false));
        let editor = {
            let mut component = Component::new("e-1", "Code Editor", ComponentArea::Editor);
            component.active = true;
            h.model.insert(component)
        };

        for shared in [&inactive, &editor] {
            let uuid = shared.borrow().uuid.clone();
            h.bridge.on_component_installation_complete(
                InstalledComponent {
                    uuid,
                    content: InstalledContent::default(),
                },
                None,
            );
        }
        h.scheduler.run_deferred();

        assert!(h.scheduler.delayed.borrow().is_empty());
        assert!(h.dom.links.borrow().is_empty());
    }
}
