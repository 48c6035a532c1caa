//! Turns a finished wizard state into a widget config

use uuid::Uuid;
use widget_wizard_config::{ChartNamespaces, WizardConfig};
use widget_wizard_shared::{
    AreaSeries, AttributeSelection, BarSeries, ChartType, Geometry, SeriesDescriptor,
    WidgetConfig, WizardState,
};

/// Curve interpolation of area series
const AREA_CURVE: &str = "monotone";

#[derive(Debug, Clone, Default)]
pub struct WidgetConfigBuilder {
    namespaces: ChartNamespaces,
    geometry: Geometry,
}

impl WidgetConfigBuilder {
    pub fn new(namespaces: ChartNamespaces) -> Self {
        Self {
            namespaces,
            geometry: Geometry::default(),
        }
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self {
            namespaces: config.namespaces.clone(),
            geometry: config.layout.geometry(),
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn namespace(&self, chart_type: ChartType) -> &str {
        match chart_type {
            ChartType::Area => &self.namespaces.area,
            ChartType::Bar => &self.namespaces.bar,
        }
    }

    /// `{namespace}/{uuid}`
    pub fn widget_id(&self, chart_type: ChartType, uuid: Uuid) -> String {
        format!("{}/{}", self.namespace(chart_type), uuid)
    }

    /// Build a widget with a fresh random id
    pub fn build(&self, chart_type: ChartType, state: &WizardState) -> WidgetConfig {
        self.build_with_id(chart_type, state, Uuid::new_v4())
    }

    /// Build a widget with a caller-chosen id. Series follow the order of the
    /// selected attributes.
    pub fn build_with_id(&self, chart_type: ChartType, state: &WizardState, uuid: Uuid) -> WidgetConfig {
        WidgetConfig {
            id: self.widget_id(chart_type, uuid),
            chart_type,
            geometry: self.geometry,
            series: state
                .attributes
                .iter()
                .map(|selection| series_for(chart_type, selection))
                .collect(),
            meta: state.meta(),
        }
    }
}

fn series_for(chart_type: ChartType, selection: &AttributeSelection) -> SeriesDescriptor {
    let data_key = selection.attribute_id.clone();
    let name = selection.series_name().to_string();

    match chart_type {
        ChartType::Area => SeriesDescriptor::Area(AreaSeries {
            curve: AREA_CURVE.to_string(),
            fill: format!("url(#{})", AreaSeries::gradient_id(&data_key)),
            data_key,
            stroke: selection.color.clone(),
            fill_opacity: 1.0,
            name,
        }),
        ChartType::Bar => SeriesDescriptor::Bar(BarSeries {
            data_key,
            fill: selection.color.clone(),
            name,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use widget_wizard_shared::{AttributeId, GeneralInfo, LayoutRow};

    fn selection(device: &str, label: &str, color: &str, description: Option<&str>) -> AttributeSelection {
        AttributeSelection {
            device_id: device.to_string(),
            attribute_id: AttributeId::compose(device, label),
            device_label: device.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            is_dynamic: true,
            description: description.map(str::to_string),
        }
    }

    fn finished_state() -> WizardState {
        WizardState {
            general: GeneralInfo {
                name: Some("Plant".to_string()),
                description: Some("Line 2".to_string()),
            },
            attributes: vec![
                selection("d1", "temp", "#004dcf", Some("Boiler temp")),
                selection("d2", "flow", "#ff0000", None),
            ],
            ..WizardState::default()
        }
    }

    #[test]
    fn test_area_series() {
        let builder = WidgetConfigBuilder::default();
        let uuid = Uuid::new_v4();
        let config = builder.build_with_id(ChartType::Area, &finished_state(), uuid);

        assert_eq!(config.id, format!("area/{uuid}"));
        assert_eq!(config.meta.title, "Plant");
        assert_eq!(config.meta.sub_title, "Line 2");

        let series = serde_json::to_value(&config.series).unwrap();
        assert_eq!(
            series[0],
            json!({
                "type": "monotone",
                "dataKey": "d1temp",
                "stroke": "#004dcf",
                "fillOpacity": 1.0,
                "fill": "url(#colord1temp)",
                "name": "Boiler temp"
            })
        );
        assert_eq!(series[1]["name"], "flow");
    }

    #[test]
    fn test_bar_series() {
        let builder = WidgetConfigBuilder::default();
        let config = builder.build(ChartType::Bar, &finished_state());

        assert!(config.id.starts_with("bar/"));
        let series = serde_json::to_value(&config.series).unwrap();
        assert_eq!(
            series[1],
            json!({ "dataKey": "d2flow", "fill": "#ff0000", "name": "flow" })
        );
    }

    #[test]
    fn test_geometry_comes_from_config() {
        let mut config = WizardConfig::default();
        config.namespaces.area = "plant/area".to_string();
        config.layout.w = 12;

        let widget = WidgetConfigBuilder::from_config(&config).build(ChartType::Area, &WizardState::default());
        assert!(widget.id.starts_with("plant/area/"));
        assert!(widget.series.is_empty());

        let descriptor = widget.descriptor();
        assert_eq!(descriptor.geometry.w, 12);
        assert_eq!(descriptor.geometry.y, LayoutRow::AppendAtEnd);

        let pinned = WidgetConfigBuilder::default().with_geometry(Geometry {
            y: LayoutRow::At(4),
            ..Geometry::default()
        });
        assert_eq!(pinned.build(ChartType::Bar, &WizardState::default()).geometry.y, LayoutRow::At(4));
    }

    #[test]
    fn test_ids_are_unique() {
        let builder = WidgetConfigBuilder::default();
        let state = WizardState::default();
        assert_ne!(builder.build(ChartType::Area, &state).id, builder.build(ChartType::Area, &state).id);
    }
}
