//! The attribute step: searchable, paginated candidate rows plus the
//! selection model behind them.

use crate::candidates::{derive_candidates, matches_term};
use crate::selection::{AttributeSelectionModel, ColorIndicator};
use serde::Serialize;
use std::time::Instant;
use widget_wizard_config::WizardConfig;
use widget_wizard_data::{ClientPageSource, Debouncer, Moment, PageSource, PaginatorState};
use widget_wizard_shared::{
    AttributeCandidate, AttributeId, ChartType, Device, StepPayload, Template, WizardResult,
    WizardState,
};

/// One rendered row of the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRow<'a> {
    pub candidate: &'a AttributeCandidate,
    pub selectable: bool,
    pub selected: bool,
    pub color: ColorIndicator,
    pub editing_color: bool,
    pub description: Option<&'a str>,
}

pub struct AttributeStep<I = Instant> {
    model: AttributeSelectionModel,
    pages: ClientPageSource<AttributeCandidate>,
    search: Debouncer<String, I>,
    term: String,
}

impl<I: Moment> AttributeStep<I> {
    /// Build the step from the devices or templates chosen so far, restoring
    /// any selections already stored in `state`
    pub fn new(state: &WizardState, config: &WizardConfig, chart_type: ChartType) -> Self {
        let candidates = derive_candidates(&state.devices, &state.templates);
        let model = AttributeSelectionModel::new(
            candidates.clone(),
            config.rules(chart_type).clone(),
            config.colors.clone(),
        )
        .with_selections(state.attributes.clone());

        Self {
            model,
            pages: ClientPageSource::new(candidates, config.pagination.default_page_size),
            search: Debouncer::new(config.search.debounce()),
            term: String::new(),
        }
    }

    /// Record a keystroke in the search box. The term applies once the
    /// input has been quiet for the debounce window.
    pub fn search_input(&mut self, raw: &str, now: I) {
        self.search.schedule(raw.to_lowercase(), now);
    }

    /// Apply the pending search term if its window has elapsed
    pub fn poll_search(&mut self, now: I) -> bool {
        match self.search.poll(now) {
            Some(term) => self.apply_search(&term),
            None => false,
        }
    }

    pub fn search_deadline(&self) -> Option<I> {
        self.search.deadline()
    }

    /// Apply `term` immediately, dropping any pending keystrokes. Returns
    /// whether the visible rows changed; a new term returns to page 1.
    pub fn apply_search(&mut self, term: &str) -> bool {
        self.search.cancel();
        let term = term.to_lowercase();
        if term == self.term {
            return false;
        }

        log::debug!("Attribute search term applied: {term:?}");
        if term.is_empty() {
            self.pages.clear_filter();
        } else {
            let needle = term.clone();
            self.pages.set_filter(move |candidate| matches_term(candidate, &needle));
        }
        self.term = term;
        true
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    /// Rebuild the rows after the device or template choice changed.
    /// Selections are kept.
    pub fn refresh_candidates(&mut self, devices: &[Device], templates: &[Template]) {
        let candidates = derive_candidates(devices, templates);
        self.model.replace_candidates(candidates.clone());
        self.pages.set_items(candidates);
    }

    pub fn paginator(&self) -> &PaginatorState<AttributeCandidate> {
        self.pages.state()
    }

    pub fn set_current_page(&mut self, page: usize) -> usize {
        self.pages.set_current_page(page)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> WizardResult<()> {
        Ok(self.pages.set_page_size(page_size)?)
    }

    /// Rows of the current page
    pub fn rows(&self) -> Vec<AttributeRow<'_>> {
        self.pages
            .page_data()
            .iter()
            .map(|candidate| {
                let id = &candidate.attribute_id;
                AttributeRow {
                    candidate,
                    selectable: self.model.is_selectable(candidate),
                    selected: self.model.is_selected(id),
                    color: self.model.color_indicator(id),
                    editing_color: self.model.color_editor() == Some(id),
                    description: self
                        .model
                        .selection(id)
                        .and_then(|selection| selection.description.as_deref()),
                }
            })
            .collect()
    }

    pub fn model(&self) -> &AttributeSelectionModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AttributeSelectionModel {
        &mut self.model
    }

    pub fn toggle(&mut self, id: &AttributeId, enable: bool) -> WizardResult<()> {
        self.model.toggle_selection(id, enable)
    }

    /// Payload submitted with `next`
    pub fn payload(&self) -> StepPayload {
        StepPayload::Attributes(self.model.selections().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use widget_wizard_shared::{DeviceAttribute, ValueType};

    fn device(id: &str, label: &str, attrs: &[&str]) -> Device {
        Device {
            id: id.to_string(),
            label: label.to_string(),
            attrs: attrs
                .iter()
                .map(|label| DeviceAttribute {
                    label: label.to_string(),
                    value_type: ValueType::Number,
                    is_dynamic: true,
                })
                .collect(),
        }
    }

    fn state() -> WizardState {
        WizardState {
            devices: vec![
                device("d1", "Boiler", &["temperature", "pressure", "flow"]),
                device("d2", "Pump", &["speed", "pressure", "power"]),
            ],
            ..WizardState::default()
        }
    }

    #[test]
    fn test_debounced_search_filters_rows() {
        let start = Instant::now();
        let mut step: AttributeStep = AttributeStep::new(&state(), &WizardConfig::default(), ChartType::Area);
        assert_eq!(step.paginator().total_pages, 2);

        for (i, term) in ["T", "Te", "Tem", "Temp"].iter().enumerate() {
            step.search_input(term, start + Duration::from_millis(i as u64 * 100));
        }
        assert!(!step.poll_search(start + Duration::from_millis(500)));
        assert_eq!(step.search_term(), "");

        assert!(step.poll_search(start + Duration::from_millis(1300)));
        assert_eq!(step.search_term(), "temp");
        assert_eq!(step.paginator().total_pages, 1);

        let rows = step.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].candidate.display_label(), "[Boiler] temperature");
    }

    #[test]
    fn test_new_term_returns_to_first_page() {
        let mut step: AttributeStep = AttributeStep::new(&state(), &WizardConfig::default(), ChartType::Bar);
        assert_eq!(step.set_current_page(2), 2);

        assert!(step.apply_search("pressure"));
        assert_eq!(step.paginator().current_page, 1);
        assert_eq!(step.rows().len(), 2);

        assert!(!step.apply_search("PRESSURE"));
        assert!(step.apply_search(""));
        assert_eq!(step.rows().len(), 5);
    }

    #[test]
    fn test_rows_reflect_selection() {
        let mut step: AttributeStep = AttributeStep::new(&state(), &WizardConfig::default(), ChartType::Area);
        let id = AttributeId::compose("d2", "speed");

        step.toggle(&id, true).unwrap();
        step.model_mut().set_description(&id, "Pump speed").unwrap();
        step.apply_search("speed");

        let rows = step.rows();
        assert!(rows[0].selected && rows[0].selectable);
        assert_eq!(rows[0].description, Some("Pump speed"));
        assert!(rows[0].color.is_active());

        match step.payload() {
            StepPayload::Attributes(values) => assert_eq!(values[0].attribute_id, id),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_selection_survives_refresh() {
        let mut step: AttributeStep = AttributeStep::new(&state(), &WizardConfig::default(), ChartType::Area);
        let id = AttributeId::compose("d1", "flow");
        step.toggle(&id, true).unwrap();

        let devices = vec![device("d1", "Boiler", &["flow"])];
        step.refresh_candidates(&devices, &[]);

        assert_eq!(step.paginator().data.len(), 1);
        assert!(step.model().is_selected(&id));
    }
}
