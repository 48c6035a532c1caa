//! Selection state of the attribute step
//!
//! Rows are keyed by [`AttributeId`], so a selection survives the candidate
//! list being rebuilt or re-sorted. Selections keep the order in which rows
//! were enabled; that order becomes the series order of the chart.

use crate::candidates;
use serde::Serialize;
use widget_wizard_config::{AttributeRules, ColorConfig};
use widget_wizard_shared::{
    AttributeCandidate, AttributeId, AttributeSelection, WizardError, WizardResult,
};

/// Color swatch shown next to a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "hex", rename_all = "camelCase")]
pub enum ColorIndicator {
    /// Row is selected and plots with this color
    Active(String),
    /// Row is not selected; the placeholder color is shown
    Disabled(String),
}

impl ColorIndicator {
    pub fn hex(&self) -> &str {
        match self {
            ColorIndicator::Active(hex) | ColorIndicator::Disabled(hex) => hex,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ColorIndicator::Active(_))
    }
}

#[derive(Debug, Clone)]
pub struct AttributeSelectionModel {
    candidates: Vec<AttributeCandidate>,
    rules: AttributeRules,
    colors: ColorConfig,
    selections: Vec<AttributeSelection>,
    color_editor: Option<AttributeId>,
}

impl AttributeSelectionModel {
    pub fn new(candidates: Vec<AttributeCandidate>, rules: AttributeRules, colors: ColorConfig) -> Self {
        Self {
            candidates,
            rules,
            colors,
            selections: Vec::new(),
            color_editor: None,
        }
    }

    /// Restore selections made on an earlier visit to the step
    pub fn with_selections(mut self, selections: Vec<AttributeSelection>) -> Self {
        self.selections = selections
            .into_iter()
            .map(|mut selection| {
                if self.is_placeholder(&selection.color) {
                    selection.color = self.colors.default_color.clone();
                }
                selection
            })
            .collect();
        self
    }

    pub fn candidates(&self) -> &[AttributeCandidate] {
        &self.candidates
    }

    /// Swap in a rebuilt candidate list. Existing selections are kept.
    pub fn replace_candidates(&mut self, candidates: Vec<AttributeCandidate>) {
        self.candidates = candidates;
    }

    pub fn candidate(&self, id: &AttributeId) -> Option<&AttributeCandidate> {
        self.candidates.iter().find(|c| &c.attribute_id == id)
    }

    pub fn rules(&self) -> &AttributeRules {
        &self.rules
    }

    pub fn is_selectable(&self, candidate: &AttributeCandidate) -> bool {
        candidates::is_selectable(candidate, &self.rules.accepted_types, self.rules.static_supported)
    }

    /// Enable or disable a row.
    ///
    /// Enabling an already selected row and disabling an unselected one are
    /// no-ops. Disabling a row closes its color editor.
    pub fn toggle_selection(&mut self, id: &AttributeId, enable: bool) -> WizardResult<()> {
        if !enable {
            self.selections.retain(|s| &s.attribute_id != id);
            if self.color_editor.as_ref() == Some(id) {
                self.color_editor = None;
            }
            log::debug!("Attribute {id} disabled");
            return Ok(());
        }

        if self.is_selected(id) {
            return Ok(());
        }

        let candidate = self.candidate(id).ok_or_else(|| WizardError::AttributeNotFound {
            attribute_id: id.to_string(),
        })?;
        if !self.is_selectable(candidate) {
            return Err(WizardError::AttributeNotSelectable {
                attribute_id: id.to_string(),
            });
        }

        let selection = AttributeSelection::from_candidate(candidate, self.colors.default_color.clone());
        self.selections.push(selection);
        log::debug!("Attribute {id} enabled");
        Ok(())
    }

    pub fn is_selected(&self, id: &AttributeId) -> bool {
        self.selection(id).is_some()
    }

    pub fn selection(&self, id: &AttributeId) -> Option<&AttributeSelection> {
        self.selections.iter().find(|s| &s.attribute_id == id)
    }

    fn selection_mut(&mut self, id: &AttributeId) -> WizardResult<&mut AttributeSelection> {
        self.selections
            .iter_mut()
            .find(|s| &s.attribute_id == id)
            .ok_or_else(|| WizardError::AttributeNotSelected {
                attribute_id: id.to_string(),
            })
    }

    pub fn selections(&self) -> &[AttributeSelection] {
        &self.selections
    }

    pub fn into_selections(self) -> Vec<AttributeSelection> {
        self.selections
    }

    pub fn color_indicator(&self, id: &AttributeId) -> ColorIndicator {
        match self.selection(id) {
            Some(selection) => ColorIndicator::Active(selection.color.clone()),
            None => ColorIndicator::Disabled(self.colors.disabled_color.clone()),
        }
    }

    /// Open the color editor of a selected row, closing any other one.
    /// Returns the row whose editor was closed.
    pub fn open_color_editor(&mut self, id: &AttributeId) -> WizardResult<Option<AttributeId>> {
        if !self.is_selected(id) {
            return Err(WizardError::AttributeNotSelected {
                attribute_id: id.to_string(),
            });
        }
        let previous = self.color_editor.replace(id.clone());
        Ok(previous.filter(|previous| previous != id))
    }

    pub fn close_color_editor(&mut self) -> Option<AttributeId> {
        self.color_editor.take()
    }

    pub fn color_editor(&self) -> Option<&AttributeId> {
        self.color_editor.as_ref()
    }

    /// Set the color of a selected row and close its editor. The color is
    /// passed through as given; only a blank string is rejected.
    pub fn set_color(&mut self, id: &AttributeId, color: &str) -> WizardResult<()> {
        if color.trim().is_empty() {
            return Err(WizardError::InvalidColor {
                value: color.to_string(),
            });
        }
        self.selection_mut(id)?.color = color.to_string();
        if self.color_editor.as_ref() == Some(id) {
            self.color_editor = None;
        }
        Ok(())
    }

    /// Set the legend label of a selected row. Blank text clears it.
    pub fn set_description(&mut self, id: &AttributeId, text: &str) -> WizardResult<()> {
        let selection = self.selection_mut(id)?;
        selection.description = if text.trim().is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        Ok(())
    }

    fn is_placeholder(&self, color: &str) -> bool {
        color.eq_ignore_ascii_case(&self.colors.disabled_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widget_wizard_shared::ValueType;

    fn candidate(device: &str, label: &str, value_type: ValueType, is_dynamic: bool) -> AttributeCandidate {
        AttributeCandidate {
            device_id: device.to_string(),
            device_label: device.to_uppercase(),
            attribute_id: AttributeId::compose(device, label),
            attribute_label: label.to_string(),
            value_type,
            is_dynamic,
        }
    }

    fn sample_model() -> AttributeSelectionModel {
        AttributeSelectionModel::new(
            vec![
                candidate("d1", "temperature", ValueType::Number, true),
                candidate("d1", "serial", ValueType::String, false),
                candidate("d2", "pressure", ValueType::Number, true),
            ],
            AttributeRules::new([ValueType::Number], false),
            ColorConfig::default(),
        )
    }

    #[test]
    fn test_enable_assigns_default_color() {
        let mut model = sample_model();
        let id = AttributeId::compose("d1", "temperature");

        model.toggle_selection(&id, true).unwrap();
        assert_eq!(model.color_indicator(&id), ColorIndicator::Active("#004dcf".to_string()));
        assert_eq!(model.selections().len(), 1);
        assert_eq!(model.selections()[0].device_label, "D1");

        // Enabling twice does not duplicate the row
        model.toggle_selection(&id, true).unwrap();
        assert_eq!(model.selections().len(), 1);
    }

    #[test]
    fn test_disable_reverts_to_placeholder() {
        let mut model = sample_model();
        let id = AttributeId::compose("d2", "pressure");
        let before = model.candidates().to_vec();

        model.toggle_selection(&id, true).unwrap();
        model.set_color(&id, "#ff0000").unwrap();
        model.toggle_selection(&id, false).unwrap();

        assert!(model.selections().is_empty());
        assert_eq!(model.candidates(), before.as_slice());
        assert_eq!(model.color_indicator(&id), ColorIndicator::Disabled("#FAFAFA".to_string()));

        model.toggle_selection(&id, true).unwrap();
        assert_eq!(model.color_indicator(&id).hex(), "#004dcf");
    }

    #[test]
    fn test_unselectable_rows_are_rejected() {
        let mut model = sample_model();
        let serial = AttributeId::compose("d1", "serial");

        assert!(matches!(
            model.toggle_selection(&serial, true),
            Err(WizardError::AttributeNotSelectable { .. })
        ));
        assert!(matches!(
            model.set_color(&serial, "#123456"),
            Err(WizardError::AttributeNotSelected { .. })
        ));
        assert!(matches!(
            model.toggle_selection(&AttributeId::from("missing"), true),
            Err(WizardError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_single_color_editor() {
        let mut model = sample_model();
        let temperature = AttributeId::compose("d1", "temperature");
        let pressure = AttributeId::compose("d2", "pressure");
        model.toggle_selection(&temperature, true).unwrap();
        model.toggle_selection(&pressure, true).unwrap();

        assert_eq!(model.open_color_editor(&temperature).unwrap(), None);
        assert_eq!(model.open_color_editor(&pressure).unwrap(), Some(temperature.clone()));
        assert_eq!(model.color_editor(), Some(&pressure));

        model.set_color(&pressure, "#0f0").unwrap();
        assert_eq!(model.color_editor(), None);
        assert_eq!(model.selection(&pressure).unwrap().color, "#0f0");
    }

    #[test]
    fn test_invalid_color_leaves_editor_open() {
        let mut model = sample_model();
        let id = AttributeId::compose("d1", "temperature");
        model.toggle_selection(&id, true).unwrap();
        model.open_color_editor(&id).unwrap();

        assert!(matches!(model.set_color(&id, ""), Err(WizardError::InvalidColor { .. })));
        assert!(matches!(model.set_color(&id, "  "), Err(WizardError::InvalidColor { .. })));
        assert_eq!(model.color_editor(), Some(&id));
        assert_eq!(model.selection(&id).unwrap().color, "#004dcf");

        model.toggle_selection(&id, false).unwrap();
        assert_eq!(model.color_editor(), None);
    }

    #[test]
    fn test_any_color_string_is_accepted() {
        let mut model = sample_model();
        let id = AttributeId::compose("d1", "temperature");
        model.toggle_selection(&id, true).unwrap();

        for color in ["#004dcfff", "rgb(0,77,207)", "red"] {
            model.set_color(&id, color).unwrap();
            assert_eq!(model.color_indicator(&id), ColorIndicator::Active(color.to_string()));
        }
    }

    #[test]
    fn test_description_and_restore() {
        let mut model = sample_model();
        let id = AttributeId::compose("d1", "temperature");
        model.toggle_selection(&id, true).unwrap();
        model.set_description(&id, "Boiler temp").unwrap();
        assert_eq!(model.selection(&id).unwrap().series_name(), "Boiler temp");

        model.set_description(&id, "  ").unwrap();
        assert_eq!(model.selection(&id).unwrap().description, None);

        let mut stored = model.into_selections();
        stored[0].color = "#fafafa".to_string();
        let restored = sample_model().with_selections(stored);
        assert_eq!(restored.color_indicator(&id).hex(), "#004dcf");
    }

    #[test]
    fn test_selections_survive_candidate_rebuild() {
        let mut model = sample_model();
        let id = AttributeId::compose("d2", "pressure");
        model.toggle_selection(&id, true).unwrap();

        let mut rebuilt = model.candidates().to_vec();
        rebuilt.reverse();
        model.replace_candidates(rebuilt);

        assert!(model.is_selected(&id));
        assert_eq!(model.candidates()[0].attribute_id, id);
    }
}
