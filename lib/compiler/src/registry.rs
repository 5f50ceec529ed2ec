//! The task descriptor registry.
//!
//! The registry maps a task type to its immutable descriptor. It is
//! populated once at process start, either from the built-in catalog or
//! from a [`CatalogDocument`] fetched from a remote catalog service,
//! and is read-only afterwards.

use crate::error::{RegistryError, UnknownTaskType};
use crate::task::{PortSpec, PortType, TaskDescriptor, TaskType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only lookup table from task type to descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRegistry {
    descriptors: BTreeMap<TaskType, TaskDescriptor>,
}

impl TaskRegistry {
    /// Builds the registry from the built-in task catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let descriptors = builtin_catalog()
            .into_iter()
            .map(|d| (d.task, d))
            .collect();
        Self { descriptors }
    }

    /// Builds a registry from an explicit set of descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the same task type appears twice.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TaskDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for descriptor in descriptors {
            let task = descriptor.task;
            if map.insert(task, descriptor).is_some() {
                return Err(RegistryError::DuplicateTaskType { task });
            }
        }
        Ok(Self { descriptors: map })
    }

    /// Builds a registry from a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog lists the same task type twice.
    pub fn from_catalog(catalog: CatalogDocument) -> Result<Self, RegistryError> {
        Self::from_descriptors(catalog.tasks)
    }

    /// Exports the registry contents as a catalog document.
    #[must_use]
    pub fn to_catalog(&self) -> CatalogDocument {
        CatalogDocument {
            tasks: self.descriptors.values().cloned().collect(),
        }
    }

    /// Looks up the descriptor for a task type.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTaskType`] if the registry has no entry for it.
    pub fn lookup(&self, task: TaskType) -> Result<&TaskDescriptor, UnknownTaskType> {
        self.descriptors.get(&task).ok_or(UnknownTaskType { task })
    }

    /// Returns true if the registry has a descriptor for the task type.
    #[must_use]
    pub fn contains(&self, task: TaskType) -> bool {
        self.descriptors.contains_key(&task)
    }

    /// Iterates over all descriptors in task-type order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.descriptors.values()
    }

    /// Returns the number of registered task types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Wire format for sourcing descriptors from a remote catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// The task descriptors offered by the catalog.
    pub tasks: Vec<TaskDescriptor>,
}

/// The built-in web-automation task catalog.
///
/// Port names are user-facing strings shared with the editor; the
/// compiler only matches on them verbatim.
fn builtin_catalog() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor {
            task: TaskType::LaunchBrowserHeadless,
            label: "Launch browser (headless)".to_string(),
            inputs: vec![PortSpec::literal("Website URL", PortType::String)],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: true,
            credits: 5,
        },
        TaskDescriptor {
            task: TaskType::NavigateUrl,
            label: "Navigate URL".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("URL", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 2,
        },
        TaskDescriptor {
            task: TaskType::PageToHtml,
            label: "Get HTML from page".to_string(),
            inputs: vec![PortSpec::required("Web page", PortType::BrowserInstance)],
            outputs: vec![
                PortSpec::output("Html", PortType::String),
                PortSpec::output("Web page", PortType::BrowserInstance),
            ],
            is_entry_point: false,
            credits: 2,
        },
        TaskDescriptor {
            task: TaskType::ExtractTextFromElement,
            label: "Extract text from element".to_string(),
            inputs: vec![
                PortSpec::required("Html", PortType::String),
                PortSpec::required("Selector", PortType::String),
            ],
            outputs: vec![PortSpec::output("Extracted text", PortType::String)],
            is_entry_point: false,
            credits: 2,
        },
        TaskDescriptor {
            task: TaskType::FillInput,
            label: "Fill input".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("Selector", PortType::String),
                PortSpec::required("Value", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::ClickElement,
            label: "Click element".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("Selector", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::ScrollToElement,
            label: "Scroll to element".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("Selector", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::WaitForElement,
            label: "Wait for element".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("Selector", PortType::String),
                PortSpec::literal("Visibility", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::ReadPropertyFromJson,
            label: "Read property from JSON".to_string(),
            inputs: vec![
                PortSpec::required("JSON", PortType::String),
                PortSpec::required("Property name", PortType::String),
            ],
            outputs: vec![PortSpec::output("Property value", PortType::String)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::AddPropertyToJson,
            label: "Add property to JSON".to_string(),
            inputs: vec![
                PortSpec::required("JSON", PortType::String),
                PortSpec::required("Property name", PortType::String),
                PortSpec::required("Property value", PortType::String),
            ],
            outputs: vec![PortSpec::output("Updated JSON", PortType::String)],
            is_entry_point: false,
            credits: 1,
        },
        TaskDescriptor {
            task: TaskType::ExtractDataWithAi,
            label: "Extract data with AI".to_string(),
            inputs: vec![
                PortSpec::required("Content", PortType::String),
                PortSpec::required("Credentials", PortType::Credential),
                PortSpec::required("Prompt", PortType::String),
            ],
            outputs: vec![PortSpec::output("Extracted data", PortType::String)],
            is_entry_point: false,
            credits: 4,
        },
        TaskDescriptor {
            task: TaskType::DeliverViaWebhook,
            label: "Deliver via webhook".to_string(),
            inputs: vec![
                PortSpec::required("Target URL", PortType::String),
                PortSpec::required("Body", PortType::String),
            ],
            outputs: vec![],
            is_entry_point: false,
            credits: 1,
        },
    ]
}
