//! The component record and its application-data bag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transmission::InstalledContent;

/// App-data key under which a failed installation is recorded.
pub const INSTALL_ERROR_KEY: &str = "installError";

/// Capability area a component plugs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentArea {
    Themes,
    Editor,
}

/// An installable extension (theme or editor).
///
/// Owned and mutated by the model layer; the desktop shell may only ever
/// overwrite `package_info` and `local_url`, and only through
/// [`Component::apply_installed_fields`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub uuid: String,
    pub name: String,
    pub area: ComponentArea,
    #[serde(default)]
    pub active: bool,
    /// Where the component is served from when no local copy exists.
    #[serde(default)]
    pub hosted_url: Option<String>,
    /// Raw item content (theme css, editor bundle). Never sent to the
    /// desktop shell; see [`crate::transmission::ComponentTransmission`].
    #[serde(default)]
    pub content: Option<Value>,
    /// Package metadata written back by the desktop shell after install.
    #[serde(default)]
    pub package_info: Option<Value>,
    /// Local resource URL written back by the desktop shell after install.
    #[serde(default)]
    pub local_url: Option<String>,
    /// Opaque per-component application data.
    #[serde(default)]
    pub app_data: Map<String, Value>,
    #[serde(skip)]
    pub dirty: bool,
}

impl Component {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, area: ComponentArea) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            area,
            active: false,
            hosted_url: None,
            content: None,
            package_info: None,
            local_url: None,
            app_data: Map::new(),
            dirty: false,
        }
    }

    pub fn is_theme(&self) -> bool {
        self.area == ComponentArea::Themes
    }

    /// Overwrite the two fields the desktop shell is permitted to change.
    pub fn apply_installed_fields(&mut self, fields: InstalledContent) {
        self.package_info = fields.package_info;
        self.local_url = fields.local_url;
    }

    /// Record or clear (`None` stores a JSON null) an installation error.
    pub fn set_install_error(&mut self, error: Option<String>) {
        let value = match error {
            Some(message) => Value::String(message),
            None => Value::Null,
        };
        self.app_data.insert(INSTALL_ERROR_KEY.to_string(), value);
    }

    pub fn install_error(&self) -> Option<&str> {
        self.app_data.get(INSTALL_ERROR_KEY).and_then(Value::as_str)
    }
}
