// Wizard state accumulated across the four steps.
// Field names mirror the payload keys dispatched by the step views.

use crate::{AttributeSelection, Device, GeneralInfo, Template, WizardError, WidgetMeta};
use serde::{Deserialize, Serialize};

/// The ordered wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    #[default]
    General,
    Devices,
    Attributes,
    Summary,
}

impl WizardStep {
    pub const COUNT: usize = 4;

    pub fn index(self) -> u8 {
        match self {
            WizardStep::General => 0,
            WizardStep::Devices => 1,
            WizardStep::Attributes => 2,
            WizardStep::Summary => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(WizardStep::General),
            1 => Some(WizardStep::Devices),
            2 => Some(WizardStep::Attributes),
            3 => Some(WizardStep::Summary),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::General => "General",
            WizardStep::Devices => "Devices",
            WizardStep::Attributes => "Attributes",
            WizardStep::Summary => "Summary",
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.index()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = WizardError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        WizardStep::from_index(index).ok_or(WizardError::StepOutOfRange {
            step: index,
            transition: "enter".to_string(),
        })
    }
}

/// Payload carried by a `next` transition, keyed by the state slot it fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "values", rename_all = "camelCase")]
pub enum StepPayload {
    General(GeneralInfo),
    Devices(Vec<Device>),
    Templates(Vec<Template>),
    Attributes(Vec<AttributeSelection>),
}

impl StepPayload {
    pub fn key(&self) -> &'static str {
        match self {
            StepPayload::General(_) => "general",
            StepPayload::Devices(_) => "devices",
            StepPayload::Templates(_) => "templates",
            StepPayload::Attributes(_) => "attributes",
        }
    }
}

/// Complete state of one wizard session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub general: GeneralInfo,
    pub devices: Vec<Device>,
    #[serde(default)]
    pub templates: Vec<Template>,
    pub attributes: Vec<AttributeSelection>,
    pub active_step: WizardStep,
}

/// Read-only view rendered on the summary step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSummary<'a> {
    pub meta: WidgetMeta,
    pub values: &'a [AttributeSelection],
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a step payload in its slot, leaving the other slots untouched
    pub fn store(&mut self, payload: StepPayload) {
        match payload {
            StepPayload::General(general) => self.general = general,
            StepPayload::Devices(devices) => self.devices = devices,
            StepPayload::Templates(templates) => self.templates = templates,
            StepPayload::Attributes(attributes) => self.attributes = attributes,
        }
    }

    /// Title block derived from the general step
    pub fn meta(&self) -> WidgetMeta {
        WidgetMeta {
            title: self.general.name.clone().unwrap_or_default(),
            sub_title: self.general.description.clone().unwrap_or_default(),
        }
    }

    pub fn summary(&self) -> WizardSummary<'_> {
        WizardSummary {
            meta: self.meta(),
            values: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_bounds() {
        assert_eq!(WizardStep::General.previous(), None);
        assert_eq!(WizardStep::General.next(), Some(WizardStep::Devices));
        assert_eq!(WizardStep::Summary.next(), None);
        assert_eq!(WizardStep::Summary.previous(), Some(WizardStep::Attributes));
        assert!(WizardStep::try_from(4).is_err());
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload: StepPayload = serde_json::from_value(serde_json::json!({
            "key": "general",
            "values": { "name": "X" }
        }))
        .unwrap();

        assert_eq!(payload, StepPayload::General(GeneralInfo::named("X")));
        assert_eq!(payload.key(), "general");
    }

    #[test]
    fn test_store_keeps_other_slots() {
        let mut state = WizardState::new();
        state.store(StepPayload::General(GeneralInfo::named("X")));
        state.store(StepPayload::Devices(vec![Device {
            id: "d1".to_string(),
            ..Default::default()
        }]));

        assert_eq!(state.general.name.as_deref(), Some("X"));
        assert_eq!(state.devices.len(), 1);
        assert_eq!(state.active_step, WizardStep::General);
    }

    #[test]
    fn test_meta_defaults_to_empty_strings() {
        let state = WizardState::new();
        let summary = state.summary();

        assert_eq!(summary.meta.title, "");
        assert_eq!(summary.meta.sub_title, "");
        assert!(summary.values.is_empty());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["activeStep"], 0);
    }
}
