//! Wire shapes exchanged with the desktop shell.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Component, ComponentArea};

/// A component serialized for transmission to the desktop shell.
///
/// The raw item content is left out on purpose; shipping it with every
/// installation sync is slow and the shell never needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentTransmission {
    pub uuid: String,
    pub content: TransmissionContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionContent {
    pub name: String,
    pub area: ComponentArea,
    #[serde(default)]
    pub hosted_url: Option<String>,
    #[serde(default)]
    pub package_info: Option<Value>,
    #[serde(default)]
    pub local_url: Option<String>,
}

impl ComponentTransmission {
    pub fn from_component(component: &Component) -> Self {
        Self {
            uuid: component.uuid.clone(),
            content: TransmissionContent {
                name: component.name.clone(),
                area: component.area,
                hosted_url: component.hosted_url.clone(),
                package_info: component.package_info.clone(),
                local_url: component.local_url.clone(),
            },
        }
    }
}

/// What the desktop shell reports back once an install attempt finishes.
///
/// Carries exactly the fields the shell is allowed to write; anything else
/// it might send is dropped at the deserialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledComponent {
    pub uuid: String,
    pub content: InstalledContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstalledContent {
    #[serde(default)]
    pub package_info: Option<Value>,
    #[serde(default)]
    pub local_url: Option<String>,
}
