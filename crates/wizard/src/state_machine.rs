//! Step transitions of the wizard

use serde::{Deserialize, Serialize};
use widget_wizard_shared::{StepPayload, WizardError, WizardResult, WizardState, WizardStep};

/// Actions dispatched by the step views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum WizardAction {
    Next(StepPayload),
    Back,
    Finish,
    Reset,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::Next(_) => "next",
            WizardAction::Back => "back",
            WizardAction::Finish => "finish",
            WizardAction::Reset => "reset",
        }
    }

    /// Decode an action from its JSON form.
    ///
    /// `back`, `finish` and `reset` may carry an empty or `null` payload.
    /// Unknown action types and malformed payloads are rejected with
    /// [`WizardError::InvalidAction`].
    pub fn from_json(mut value: serde_json::Value) -> WizardResult<Self> {
        let action_type = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<missing>")
            .to_string();

        if matches!(action_type.as_str(), "back" | "finish" | "reset") {
            if let Some(object) = value.as_object_mut() {
                if object.get("payload").is_some_and(is_empty_payload) {
                    object.remove("payload");
                }
            }
        }

        serde_json::from_value(value).map_err(|err| {
            log::warn!("Rejected wizard action {action_type:?}: {err}");
            WizardError::InvalidAction { action: action_type }
        })
    }

    pub fn from_json_str(json: &str) -> WizardResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(value)
    }
}

fn is_empty_payload(payload: &serde_json::Value) -> bool {
    match payload {
        serde_json::Value::Null => true,
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// What an accepted action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: WizardStep, to: WizardStep },
    Retreated { from: WizardStep, to: WizardStep },
    /// The state as it was when the user finished
    Finished { committed: WizardState },
    Reset,
}

/// Next state plus the transition that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub state: WizardState,
    pub transition: Transition,
}

/// Apply `action` to `state` without side effects.
///
/// `next` stores its payload and advances; it is rejected on the last step.
/// `back` is rejected on the first step. `finish` and `reset` both yield an
/// empty state.
pub fn reduce(state: &WizardState, action: WizardAction) -> WizardResult<Reduction> {
    let from = state.active_step;
    match action {
        WizardAction::Next(payload) => {
            let to = from.next().ok_or_else(|| WizardError::StepOutOfRange {
                step: from.index(),
                transition: "advance".to_string(),
            })?;
            let mut next = state.clone();
            next.store(payload);
            next.active_step = to;
            Ok(Reduction {
                state: next,
                transition: Transition::Advanced { from, to },
            })
        }
        WizardAction::Back => {
            let to = from.previous().ok_or_else(|| WizardError::StepOutOfRange {
                step: from.index(),
                transition: "go back".to_string(),
            })?;
            let mut next = state.clone();
            next.active_step = to;
            Ok(Reduction {
                state: next,
                transition: Transition::Retreated { from, to },
            })
        }
        WizardAction::Finish => Ok(Reduction {
            state: WizardState::default(),
            transition: Transition::Finished {
                committed: state.clone(),
            },
        }),
        WizardAction::Reset => Ok(Reduction {
            state: WizardState::default(),
            transition: Transition::Reset,
        }),
    }
}

/// Owns the wizard state and applies actions to it
#[derive(Debug, Clone, Default)]
pub struct WizardStateMachine {
    state: WizardState,
}

impl WizardStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously captured state
    pub fn with_state(state: WizardState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn active_step(&self) -> WizardStep {
        self.state.active_step
    }

    /// Apply `action`. A rejected action leaves the state untouched.
    pub fn dispatch(&mut self, action: WizardAction) -> WizardResult<Transition> {
        let name = action.name();
        let reduction = reduce(&self.state, action).map_err(|err| {
            log::warn!("Wizard action {name} rejected: {err}");
            err
        })?;

        log::debug!("Wizard {name}: {:?}", reduction.transition);
        self.state = reduction.state;
        Ok(reduction.transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use widget_wizard_shared::GeneralInfo;

    fn general(name: &str) -> WizardAction {
        WizardAction::Next(StepPayload::General(GeneralInfo::named(name)))
    }

    #[test]
    fn test_next_stores_payload_and_advances() {
        let mut machine = WizardStateMachine::new();

        let transition = machine.dispatch(general("Boiler temps")).unwrap();
        assert_eq!(
            transition,
            Transition::Advanced {
                from: WizardStep::General,
                to: WizardStep::Devices
            }
        );
        assert_eq!(machine.state().general.name.as_deref(), Some("Boiler temps"));
        assert_eq!(machine.active_step(), WizardStep::Devices);
    }

    #[test]
    fn test_back_keeps_stored_values() {
        let mut machine = WizardStateMachine::new();
        machine.dispatch(general("A")).unwrap();
        machine.dispatch(WizardAction::Back).unwrap();

        assert_eq!(machine.active_step(), WizardStep::General);
        assert_eq!(machine.state().general.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_bounds_are_enforced() {
        let mut machine = WizardStateMachine::new();
        assert!(matches!(
            machine.dispatch(WizardAction::Back),
            Err(WizardError::StepOutOfRange { step: 0, .. })
        ));

        for _ in 0..3 {
            machine.dispatch(WizardAction::Next(StepPayload::Devices(Vec::new()))).unwrap();
        }
        assert_eq!(machine.active_step(), WizardStep::Summary);

        let before = machine.state().clone();
        assert!(matches!(
            machine.dispatch(WizardAction::Next(StepPayload::Attributes(Vec::new()))),
            Err(WizardError::StepOutOfRange { step: 3, .. })
        ));
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn test_finish_and_reset_empty_the_state() {
        let mut machine = WizardStateMachine::new();
        machine.dispatch(general("Chart")).unwrap();

        match machine.dispatch(WizardAction::Finish).unwrap() {
            Transition::Finished { committed } => {
                assert_eq!(committed.general.name.as_deref(), Some("Chart"));
                assert_eq!(committed.active_step, WizardStep::Devices);
            }
            other => panic!("unexpected transition {other:?}"),
        }
        assert_eq!(machine.state(), &WizardState::default());

        machine.dispatch(general("Again")).unwrap();
        assert_eq!(machine.dispatch(WizardAction::Reset).unwrap(), Transition::Reset);
        assert_eq!(machine.state(), &WizardState::default());
    }

    #[test]
    fn test_action_json_form() {
        let action = WizardAction::from_json(json!({
            "type": "next",
            "payload": { "key": "general", "values": { "name": "Levels" } }
        }))
        .unwrap();
        assert_eq!(action, general("Levels"));
        assert_eq!(WizardAction::from_json(json!({ "type": "back" })).unwrap(), WizardAction::Back);
        assert_eq!(
            serde_json::to_value(WizardAction::Finish).unwrap(),
            json!({ "type": "finish" })
        );
    }

    #[test]
    fn test_unit_actions_accept_empty_payload() {
        for (kind, expected) in [
            ("back", WizardAction::Back),
            ("finish", WizardAction::Finish),
            ("reset", WizardAction::Reset),
        ] {
            assert_eq!(WizardAction::from_json(json!({ "type": kind, "payload": {} })).unwrap(), expected);
            assert_eq!(WizardAction::from_json(json!({ "type": kind, "payload": null })).unwrap(), expected);
        }

        let err = WizardAction::from_json(json!({ "type": "back", "payload": { "steps": 2 } })).unwrap_err();
        assert!(matches!(err, WizardError::InvalidAction { action } if action == "back"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = WizardAction::from_json(json!({ "type": "jump", "payload": 2 })).unwrap_err();
        assert_eq!(
            err,
            WizardError::InvalidAction {
                action: "jump".to_string()
            }
        );

        let err = WizardAction::from_json_str(r#"{ "payload": {} }"#).unwrap_err();
        assert!(matches!(err, WizardError::InvalidAction { action } if action == "<missing>"));
    }
}
