//! Shared types for the widget wizard
//!
//! This crate contains the data model that is shared between the data-manager,
//! wizard and wasm-bridge crates: devices and their attributes, the candidate
//! and selection rows of the attribute step, the accumulated wizard state and
//! the widget descriptors handed to the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "typescript")]
use tsify::Tsify;

pub mod errors;
pub mod widget;
pub mod wizard_state;

pub use errors::{ErrorContext, ErrorResponse, WizardError, WizardResult};
pub use widget::{
    AreaSeries, BarSeries, ChartSettings, GradientDef, Geometry, LayoutRow, SeriesDescriptor,
    WidgetConfig, WidgetDescriptor, WidgetMeta,
};
pub use wizard_state::{StepPayload, WizardState, WizardStep, WizardSummary};

/// Chart types the wizard can compose
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Area,
    Bar,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Area => "area",
            ChartType::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area" => Ok(ChartType::Area),
            "bar" => Ok(ChartType::Bar),
            _ => Err(WizardError::UnknownChartType {
                value: s.to_string(),
            }),
        }
    }
}

/// Value type reported by the device service for an attribute.
///
/// Unknown or missing values deserialize as `Undefined`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Number,
    Boolean,
    String,
    Geo,
    #[default]
    #[serde(other)]
    Undefined,
}

impl ValueType {
    pub const ALL: [ValueType; 5] = [
        ValueType::Number,
        ValueType::Boolean,
        ValueType::String,
        ValueType::Geo,
        ValueType::Undefined,
    ];
}

/// Attribute as listed on a device or template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "camelCase")]
pub struct DeviceAttribute {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub is_dynamic: bool,
}

/// Device returned by the listing service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub attrs: Vec<DeviceAttribute>,
}

/// Template returned by the listing service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub attrs: Vec<DeviceAttribute>,
}

/// Anything that owns a labelled list of attributes
pub trait AttributeOwner {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    fn attrs(&self) -> &[DeviceAttribute];
}

impl AttributeOwner for Device {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn attrs(&self) -> &[DeviceAttribute] {
        &self.attrs
    }
}

impl AttributeOwner for Template {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn attrs(&self) -> &[DeviceAttribute] {
        &self.attrs
    }
}

/// Title and description entered on the first step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
pub struct GeneralInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GeneralInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }
}

/// Identifier of an attribute row: the owning device id followed by the
/// attribute label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(String);

impl AttributeId {
    pub fn compose(device_id: &str, attribute_label: &str) -> Self {
        Self(format!("{device_id}{attribute_label}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttributeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AttributeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Attribute eligible for selection on the attribute step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCandidate {
    pub device_id: String,
    pub device_label: String,
    pub attribute_id: AttributeId,
    pub attribute_label: String,
    pub value_type: ValueType,
    pub is_dynamic: bool,
}

impl AttributeCandidate {
    /// Row title, e.g. `[Boiler] temperature`
    pub fn display_label(&self) -> String {
        format!("[{}] {}", self.device_label, self.attribute_label)
    }

    pub fn kind_label(&self) -> &'static str {
        if self.is_dynamic {
            "Dynamic"
        } else {
            "Static"
        }
    }
}

/// An attribute the user has enabled, with its visual metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSelection {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "attributeID")]
    pub attribute_id: AttributeId,
    pub device_label: String,
    pub label: String,
    pub color: String,
    pub is_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AttributeSelection {
    pub fn from_candidate(candidate: &AttributeCandidate, color: impl Into<String>) -> Self {
        Self {
            device_id: candidate.device_id.clone(),
            attribute_id: candidate.attribute_id.clone(),
            device_label: candidate.device_label.clone(),
            label: candidate.attribute_label.clone(),
            color: color.into(),
            is_dynamic: candidate.is_dynamic,
            description: None,
        }
    }

    /// Name shown in the chart legend
    pub fn series_name(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.label,
        }
    }
}

/// Whether `value` is a `#rgb` or `#rrggbb` color string
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
