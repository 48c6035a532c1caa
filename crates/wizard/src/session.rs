//! A wizard session: the state machine wired to the dashboard collaborators

use crate::builder::WidgetConfigBuilder;
use crate::collaborators::{Navigator, WidgetRegistry};
use crate::state_machine::{Transition, WizardAction, WizardStateMachine};
use serde::Serialize;
use widget_wizard_config::WizardConfig;
use widget_wizard_shared::{
    ChartType, StepPayload, WidgetConfig, WizardError, WizardResult, WizardState, WizardStep,
};

/// Result of a dispatch as seen by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SessionUpdate {
    /// Now showing this step
    Step(WizardStep),
    /// Back to an empty first step
    Reset,
    /// Widget registered; the session is closed
    Committed(WidgetConfig),
}

pub struct WizardSession<R, N> {
    chart_type: ChartType,
    builder: WidgetConfigBuilder,
    machine: Option<WizardStateMachine>,
    registry: R,
    navigator: N,
}

impl<R: WidgetRegistry, N: Navigator> WizardSession<R, N> {
    pub fn new(chart_type: ChartType, config: &WizardConfig, registry: R, navigator: N) -> Self {
        Self::with_builder(chart_type, WidgetConfigBuilder::from_config(config), registry, navigator)
    }

    pub fn with_builder(chart_type: ChartType, builder: WidgetConfigBuilder, registry: R, navigator: N) -> Self {
        log::debug!("Opening {chart_type} wizard session");
        Self {
            chart_type,
            builder,
            machine: Some(WizardStateMachine::new()),
            registry,
            navigator,
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    /// Current state, `None` once the session has finished
    pub fn state(&self) -> Option<&WizardState> {
        self.machine.as_ref().map(WizardStateMachine::state)
    }

    pub fn active_step(&self) -> Option<WizardStep> {
        self.machine.as_ref().map(WizardStateMachine::active_step)
    }

    pub fn is_closed(&self) -> bool {
        self.machine.is_none()
    }

    /// Apply `action`. Finishing registers the widget, navigates to the
    /// dashboard and closes the session.
    pub fn dispatch(&mut self, action: WizardAction) -> WizardResult<SessionUpdate> {
        let machine = self.machine.as_mut().ok_or(WizardError::SessionClosed)?;

        match machine.dispatch(action)? {
            Transition::Advanced { to, .. } | Transition::Retreated { to, .. } => Ok(SessionUpdate::Step(to)),
            Transition::Reset => Ok(SessionUpdate::Reset),
            Transition::Finished { committed } => {
                self.machine = None;
                Ok(SessionUpdate::Committed(self.commit(&committed)))
            }
        }
    }

    /// Decode and apply an action given in its JSON form
    pub fn dispatch_json(&mut self, action: serde_json::Value) -> WizardResult<SessionUpdate> {
        if self.is_closed() {
            return Err(WizardError::SessionClosed);
        }
        self.dispatch(WizardAction::from_json(action)?)
    }

    pub fn next(&mut self, payload: StepPayload) -> WizardResult<SessionUpdate> {
        self.dispatch(WizardAction::Next(payload))
    }

    pub fn back(&mut self) -> WizardResult<SessionUpdate> {
        self.dispatch(WizardAction::Back)
    }

    pub fn reset(&mut self) -> WizardResult<SessionUpdate> {
        self.dispatch(WizardAction::Reset)
    }

    /// Finish the wizard and return the registered widget
    pub fn finish(&mut self) -> WizardResult<WidgetConfig> {
        match self.dispatch(WizardAction::Finish)? {
            SessionUpdate::Committed(config) => Ok(config),
            other => Err(WizardError::InvalidAction {
                action: format!("finish produced {other:?}"),
            }),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_parts(self) -> (R, N) {
        (self.registry, self.navigator)
    }

    fn commit(&mut self, state: &WizardState) -> WidgetConfig {
        let config = self.builder.build(self.chart_type, state);
        log::info!(
            "Registering {} widget {} with {} series",
            self.chart_type,
            config.id,
            config.series.len()
        );

        self.registry.add_widget(config.descriptor());
        self.registry.add_widget_config(config.registry_entry());
        self.navigator.to_dashboard();
        config
    }
}
