//! Stylesheet link mounting.

/// Where theme stylesheets get mounted. The document head in the browser;
/// tests substitute an in-memory fake.
pub trait StylesheetDom {
    /// Append a stylesheet link for `href`, tagged with `id`.
    fn append_link(&self, id: &str, href: &str);

    /// Disable and detach the link tagged with `id`.
    /// Returns whether one existed.
    fn remove_link(&self, id: &str) -> bool;

    fn has_link(&self, id: &str) -> bool;
}

#[cfg(target_arch = "wasm32")]
mod head {
    use super::StylesheetDom;

    use wasm_bindgen::JsCast;

    /// `<head>`-backed implementation.
    pub struct DocumentHead;

    impl DocumentHead {
        fn document() -> Option<web_sys::Document> {
            web_sys::window().and_then(|window| window.document())
        }
    }

    impl StylesheetDom for DocumentHead {
        fn append_link(&self, id: &str, href: &str) {
            let Some(document) = Self::document() else {
                return;
            };
            let Some(head) = document.head() else {
                log::error!("document has no head, cannot mount stylesheet {}", id);
                return;
            };

            let element = match document.create_element("link") {
                Ok(element) => element,
                Err(e) => {
                    log::error!("failed to create link element: {:?}", e);
                    return;
                }
            };
            let link: web_sys::HtmlLinkElement = match element.dyn_into() {
                Ok(link) => link,
                Err(_) => {
                    log::error!("created element is not a link");
                    return;
                }
            };

            link.set_href(href);
            link.set_type("text/css");
            link.set_rel("stylesheet");
            link.set_media("screen,print");
            link.set_id(id);

            if let Err(e) = head.append_child(&link) {
                log::error!("failed to append stylesheet {}: {:?}", id, e);
            }
        }

        fn remove_link(&self, id: &str) -> bool {
            let Some(document) = Self::document() else {
                return false;
            };
            let Some(element) = document.get_element_by_id(id) else {
                return false;
            };
            // Disable before detaching so the styles drop out immediately.
            if let Some(link) = element.dyn_ref::<web_sys::HtmlLinkElement>() {
                link.set_disabled(true);
            }
            element.remove();
            true
        }

        fn has_link(&self, id: &str) -> bool {
            Self::document()
                .and_then(|document| document.get_element_by_id(id))
                .is_some()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use head::DocumentHead;
