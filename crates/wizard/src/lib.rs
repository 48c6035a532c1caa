//! Widget wizard core
//!
//! Ties the step views together: the device and template pickers, the
//! attribute step with its selection model, the step state machine, and the
//! builder that turns a finished session into a dashboard widget.

pub mod attribute_step;
pub mod builder;
pub mod candidates;
pub mod collaborators;
pub mod pickers;
pub mod selection;
pub mod session;
pub mod state_machine;

pub use attribute_step::{AttributeRow, AttributeStep};
pub use builder::WidgetConfigBuilder;
pub use candidates::{derive_candidates, filter_candidates, is_selectable, sort_candidates};
pub use collaborators::{InMemoryRegistry, Navigator, RecordingNavigator, WidgetRegistry};
pub use pickers::{DevicePicker, RemotePicker, TemplatePicker};
pub use selection::{AttributeSelectionModel, ColorIndicator};
pub use session::{SessionUpdate, WizardSession};
pub use state_machine::{reduce, Reduction, Transition, WizardAction, WizardStateMachine};

pub use widget_wizard_config as config;
pub use widget_wizard_data as data;
pub use widget_wizard_shared as shared;
