//! Walks an area chart wizard from start to finish and prints the widget
//! handed to the dashboard.

use std::time::{Duration, Instant};
use widget_wizard_core::config::WizardConfig;
use widget_wizard_core::shared::{
    AttributeId, ChartType, Device, DeviceAttribute, GeneralInfo, StepPayload, ValueType,
    WizardResult,
};
use widget_wizard_core::{
    AttributeStep, InMemoryRegistry, RecordingNavigator, WizardSession,
};

fn main() -> WizardResult<()> {
    env_logger::builder().filter_level(log::LevelFilter::Debug).init();

    let config = WizardConfig::default();
    let mut session = WizardSession::new(
        ChartType::Area,
        &config,
        InMemoryRegistry::default(),
        RecordingNavigator::default(),
    );

    session.next(StepPayload::General(GeneralInfo {
        name: Some("Boiler room".to_string()),
        description: Some("Last 24 hours".to_string()),
    }))?;

    let boiler = Device {
        id: "boiler-1".to_string(),
        label: "Boiler".to_string(),
        attrs: ["temperature", "pressure"]
            .iter()
            .map(|label| DeviceAttribute {
                label: label.to_string(),
                value_type: ValueType::Number,
                is_dynamic: true,
            })
            .collect(),
    };
    session.next(StepPayload::Devices(vec![boiler]))?;

    let Some(state) = session.state().cloned() else {
        return Ok(());
    };
    let mut step: AttributeStep = AttributeStep::new(&state, &config, ChartType::Area);
    let now = Instant::now();
    step.search_input("Temp", now);
    step.poll_search(now + config.search.debounce() + Duration::from_millis(1));

    for row in step.rows() {
        println!("{:<32} {:<8} {}", row.candidate.display_label(), row.candidate.kind_label(), row.color.hex());
    }

    let temperature = AttributeId::compose("boiler-1", "temperature");
    step.toggle(&temperature, true)?;
    step.model_mut().set_color(&temperature, "#e91e63")?;
    session.next(step.payload())?;

    let widget = session.finish()?;
    let (registry, navigator) = session.into_parts();

    println!("Registered widget {}", widget.id);
    println!("{}", serde_json::to_string_pretty(&registry.configs).unwrap_or_default());
    println!("Dashboard visits: {}", navigator.dashboard_visits);

    Ok(())
}
