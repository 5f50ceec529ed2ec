//! Task descriptors: the pure-data catalog entries for node types.
//!
//! A descriptor states what a task looks like to the compiler: its
//! typed input/output ports, whether it may start a workflow, and how
//! many credits one execution consumes. Presentation concerns (icons,
//! editor grouping, labels beyond a plain string) stay outside this
//! crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The data type carried by a port.
///
/// An edge is valid only between ports of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortType {
    /// Plain text: URLs, selectors, HTML, JSON payloads.
    String,
    /// A handle to a live browser page, threaded between browser tasks.
    BrowserInstance,
    /// A reference to a stored credential (e.g. an AI provider key).
    Credential,
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "STRING",
            Self::BrowserInstance => "BROWSER_INSTANCE",
            Self::Credential => "CREDENTIAL",
        };
        f.write_str(name)
    }
}

/// The type of a workflow task, keyed by its wire name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Start a headless browser session at a URL. Entry point.
    LaunchBrowserHeadless,
    /// Navigate an existing browser page to a new URL.
    NavigateUrl,
    /// Capture the current page's HTML.
    PageToHtml,
    /// Extract the text content of a CSS-selected element.
    ExtractTextFromElement,
    /// Type a value into an input element.
    FillInput,
    /// Click an element.
    ClickElement,
    /// Scroll an element into view.
    ScrollToElement,
    /// Wait until an element reaches the requested visibility.
    WaitForElement,
    /// Read one property out of a JSON document.
    ReadPropertyFromJson,
    /// Add or overwrite one property in a JSON document.
    AddPropertyToJson,
    /// Extract structured data from content with an AI model.
    ExtractDataWithAi,
    /// POST a payload to a webhook.
    DeliverViaWebhook,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LaunchBrowserHeadless => "LAUNCH_BROWSER_HEADLESS",
            Self::NavigateUrl => "NAVIGATE_URL",
            Self::PageToHtml => "PAGE_TO_HTML",
            Self::ExtractTextFromElement => "EXTRACT_TEXT_FROM_ELEMENT",
            Self::FillInput => "FILL_INPUT",
            Self::ClickElement => "CLICK_ELEMENT",
            Self::ScrollToElement => "SCROLL_TO_ELEMENT",
            Self::WaitForElement => "WAIT_FOR_ELEMENT",
            Self::ReadPropertyFromJson => "READ_PROPERTY_FROM_JSON",
            Self::AddPropertyToJson => "ADD_PROPERTY_TO_JSON",
            Self::ExtractDataWithAi => "EXTRACT_DATA_WITH_AI",
            Self::DeliverViaWebhook => "DELIVER_VIA_WEBHOOK",
        };
        f.write_str(name)
    }
}

/// Specification of a single port on a task.
///
/// The same type describes inputs and outputs; `required` and
/// `hide_handle` are meaningful for inputs only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Port name, unique within the node side it belongs to.
    pub name: String,
    /// The data type this port accepts or produces.
    pub port_type: PortType,
    /// Whether this input must be satisfied for the node to execute.
    #[serde(default)]
    pub required: bool,
    /// Literal-only inputs expose no connection handle in the editor.
    #[serde(default)]
    pub hide_handle: bool,
}

impl PortSpec {
    /// Creates a required input port.
    #[must_use]
    pub fn required(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            required: true,
            hide_handle: false,
        }
    }

    /// Creates an optional input port.
    #[must_use]
    pub fn optional(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            required: false,
            hide_handle: false,
        }
    }

    /// Creates a required input port that only accepts literal values.
    #[must_use]
    pub fn literal(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            required: true,
            hide_handle: true,
        }
    }

    /// Creates an output port.
    #[must_use]
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            required: false,
            hide_handle: false,
        }
    }
}

/// Immutable description of a task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// The task type this descriptor defines.
    pub task: TaskType,
    /// Human-readable label.
    pub label: String,
    /// Input ports, in declaration order.
    pub inputs: Vec<PortSpec>,
    /// Output ports, in declaration order.
    pub outputs: Vec<PortSpec>,
    /// Whether a node of this type may start a workflow.
    #[serde(default)]
    pub is_entry_point: bool,
    /// Credits consumed per execution of one node.
    pub credits: u32,
}

impl TaskDescriptor {
    /// Returns the input port with the given name, if any.
    #[must_use]
    pub fn input_port(&self, name: &str) -> Option<&PortSpec> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Returns the output port with the given name, if any.
    #[must_use]
    pub fn output_port(&self, name: &str) -> Option<&PortSpec> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Returns the required input ports.
    pub fn required_inputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.inputs.iter().filter(|p| p.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_type_wire_names() {
        let json = serde_json::to_string(&TaskType::LaunchBrowserHeadless).expect("serialize");
        assert_eq!(json, "\"LAUNCH_BROWSER_HEADLESS\"");

        let parsed: TaskType = serde_json::from_str("\"NAVIGATE_URL\"").expect("deserialize");
        assert_eq!(parsed, TaskType::NavigateUrl);
    }

    #[test]
    fn display_matches_wire_name() {
        for task in [
            TaskType::PageToHtml,
            TaskType::ExtractDataWithAi,
            TaskType::DeliverViaWebhook,
        ] {
            let json = serde_json::to_string(&task).expect("serialize");
            assert_eq!(json, format!("\"{task}\""));
        }
    }

    #[test]
    fn port_type_wire_names() {
        let json = serde_json::to_string(&PortType::BrowserInstance).expect("serialize");
        assert_eq!(json, "\"BROWSER_INSTANCE\"");
        assert_eq!(PortType::BrowserInstance.to_string(), "BROWSER_INSTANCE");
    }

    #[test]
    fn port_spec_constructors() {
        let web_page = PortSpec::required("Web page", PortType::BrowserInstance);
        assert!(web_page.required);
        assert!(!web_page.hide_handle);

        let url = PortSpec::literal("Website URL", PortType::String);
        assert!(url.required);
        assert!(url.hide_handle);

        let out = PortSpec::output("Html", PortType::String);
        assert!(!out.required);
    }

    #[test]
    fn descriptor_port_lookup() {
        let descriptor = TaskDescriptor {
            task: TaskType::NavigateUrl,
            label: "Navigate URL".to_string(),
            inputs: vec![
                PortSpec::required("Web page", PortType::BrowserInstance),
                PortSpec::required("URL", PortType::String),
            ],
            outputs: vec![PortSpec::output("Web page", PortType::BrowserInstance)],
            is_entry_point: false,
            credits: 2,
        };

        assert!(descriptor.input_port("URL").is_some());
        assert!(descriptor.input_port("Html").is_none());
        assert!(descriptor.output_port("Web page").is_some());
        assert_eq!(descriptor.required_inputs().count(), 2);
    }
}
