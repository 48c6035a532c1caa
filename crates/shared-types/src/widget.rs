//! Widget descriptors handed to the dashboard collaborators

use crate::{AttributeId, ChartType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Row placement of a new widget on the dashboard grid.
///
/// `AppendAtEnd` is resolved by the layout collaborator; it serializes as
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutRow {
    #[default]
    AppendAtEnd,
    At(u32),
}

impl Serialize for LayoutRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LayoutRow::AppendAtEnd => serializer.serialize_none(),
            LayoutRow::At(row) => serializer.serialize_some(row),
        }
    }
}

impl<'de> Deserialize<'de> for LayoutRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let row = Option::<u32>::deserialize(deserializer)?;
        Ok(row.map_or(LayoutRow::AppendAtEnd, LayoutRow::At))
    }
}

/// Grid geometry of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: u32,
    pub y: LayoutRow,
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: LayoutRow::AppendAtEnd,
            w: 6,
            h: 10,
            min_w: 3,
            min_h: 6,
        }
    }
}

/// Layout item passed to `addWidget`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub i: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub moved: bool,
}

/// Title block of a widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMeta {
    pub title: String,
    pub sub_title: String,
}

/// Area series: color maps to the stroke and a vertical gradient fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    #[serde(rename = "type")]
    pub curve: String,
    pub data_key: AttributeId,
    pub stroke: String,
    pub fill_opacity: f32,
    pub fill: String,
    pub name: String,
}

impl AreaSeries {
    pub fn gradient_id(data_key: &AttributeId) -> String {
        format!("color{data_key}")
    }

    /// Gradient definition referenced by `fill`
    pub fn gradient(&self) -> GradientDef {
        GradientDef {
            id: Self::gradient_id(&self.data_key),
            x1: "0".to_string(),
            y1: "0".to_string(),
            x2: "0".to_string(),
            y2: "1".to_string(),
            color: self.stroke.clone(),
        }
    }
}

/// Linear gradient used as an area fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientDef {
    pub id: String,
    pub x1: String,
    pub y1: String,
    pub x2: String,
    pub y2: String,
    pub color: String,
}

/// Bar series: color maps to a flat fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub data_key: AttributeId,
    pub fill: String,
    pub name: String,
}

/// One plotted attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesDescriptor {
    Area(AreaSeries),
    Bar(BarSeries),
}

impl SeriesDescriptor {
    pub fn data_key(&self) -> &AttributeId {
        match self {
            SeriesDescriptor::Area(series) => &series.data_key,
            SeriesDescriptor::Bar(series) => &series.data_key,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            SeriesDescriptor::Area(series) => &series.stroke,
            SeriesDescriptor::Bar(series) => &series.fill,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SeriesDescriptor::Area(series) => &series.name,
            SeriesDescriptor::Bar(series) => &series.name,
        }
    }
}

/// Chart-specific settings passed to `addWidgetConfig`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartSettings {
    Area {
        #[serde(rename = "areaProps")]
        area_props: Vec<AreaSeries>,
        #[serde(rename = "defsProps")]
        defs_props: Vec<GradientDef>,
        meta: WidgetMeta,
    },
    Bar {
        bar: Vec<BarSeries>,
        meta: WidgetMeta,
    },
}

/// Complete widget produced by the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: String,
    pub chart_type: ChartType,
    pub geometry: Geometry,
    pub series: Vec<SeriesDescriptor>,
    pub meta: WidgetMeta,
}

impl WidgetConfig {
    /// Layout item for the widget registry
    pub fn descriptor(&self) -> WidgetDescriptor {
        WidgetDescriptor {
            i: self.id.clone(),
            geometry: self.geometry,
            is_static: false,
            moved: false,
        }
    }

    /// Chart settings in the shape the chart type expects
    pub fn settings(&self) -> ChartSettings {
        let meta = self.meta.clone();
        match self.chart_type {
            ChartType::Area => {
                let area_props: Vec<AreaSeries> = self
                    .series
                    .iter()
                    .filter_map(|series| match series {
                        SeriesDescriptor::Area(area) => Some(area.clone()),
                        SeriesDescriptor::Bar(_) => None,
                    })
                    .collect();
                let defs_props = area_props.iter().map(AreaSeries::gradient).collect();
                ChartSettings::Area {
                    area_props,
                    defs_props,
                    meta,
                }
            }
            ChartType::Bar => ChartSettings::Bar {
                bar: self
                    .series
                    .iter()
                    .filter_map(|series| match series {
                        SeriesDescriptor::Bar(bar) => Some(bar.clone()),
                        SeriesDescriptor::Area(_) => None,
                    })
                    .collect(),
                meta,
            },
        }
    }

    /// `{ [id]: settings }` entry for the widget registry
    pub fn registry_entry(&self) -> HashMap<String, ChartSettings> {
        let mut entry = HashMap::with_capacity(1);
        entry.insert(self.id.clone(), self.settings());
        entry
    }
}
