//! Configuration system for the widget wizard
//! Chart namespaces, search and pagination tuning, default colors, layout
//! defaults and per-chart attribute rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use widget_wizard_shared::{ChartType, Geometry, LayoutRow, ValueType, WizardError};

pub mod parser;
pub mod validation;

pub use parser::{ConfigFormat, ConfigParser, ConfigSerializer};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for WizardError {
    fn from(err: ConfigError) -> Self {
        WizardError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

/// Complete wizard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WizardConfig {
    pub namespaces: ChartNamespaces,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
    pub charts: ChartRules,
}

impl WizardConfig {
    /// Namespace that qualifies widget ids of `chart_type`
    pub fn namespace(&self, chart_type: ChartType) -> &str {
        match chart_type {
            ChartType::Area => &self.namespaces.area,
            ChartType::Bar => &self.namespaces.bar,
        }
    }

    /// Attribute rules of `chart_type`
    pub fn rules(&self, chart_type: ChartType) -> &AttributeRules {
        match chart_type {
            ChartType::Area => &self.charts.area,
            ChartType::Bar => &self.charts.bar,
        }
    }
}

/// Widget id namespaces, supplied by the dashboard deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartNamespaces {
    pub area: String,
    pub bar: String,
}

impl Default for ChartNamespaces {
    fn default() -> Self {
        Self {
            area: "area".to_string(),
            bar: "bar".to_string(),
        }
    }
}

/// Search input tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet window before a search term is applied
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

/// Pagination defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 5,
            page_size_options: vec![5, 10, 20],
        }
    }
}

/// Attribute row colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Color given to a row when it is enabled
    pub default_color: String,
    /// Placeholder shown for rows that are not enabled
    pub disabled_color: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default_color: "#004dcf".to_string(),
            disabled_color: "#FAFAFA".to_string(),
        }
    }
}

/// Geometry of newly created widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub x: u32,
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let geometry = Geometry::default();
        Self {
            x: geometry.x,
            w: geometry.w,
            h: geometry.h,
            min_w: geometry.min_w,
            min_h: geometry.min_h,
        }
    }
}

impl LayoutConfig {
    /// Geometry for a widget appended at the end of the dashboard
    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x,
            y: LayoutRow::AppendAtEnd,
            w: self.w,
            h: self.h,
            min_w: self.min_w,
            min_h: self.min_h,
        }
    }
}

/// Which attributes a chart type can plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeRules {
    pub accepted_types: Vec<ValueType>,
    pub static_supported: bool,
}

impl Default for AttributeRules {
    fn default() -> Self {
        Self {
            accepted_types: ValueType::ALL.to_vec(),
            static_supported: true,
        }
    }
}

impl AttributeRules {
    pub fn new(accepted_types: impl Into<Vec<ValueType>>, static_supported: bool) -> Self {
        Self {
            accepted_types: accepted_types.into(),
            static_supported,
        }
    }

    pub fn accepts(&self, value_type: ValueType) -> bool {
        self.accepted_types.contains(&value_type)
    }
}

/// Attribute rules per chart type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChartRules {
    pub area: AttributeRules,
    pub bar: AttributeRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WizardConfig::default();

        assert_eq!(config.namespace(ChartType::Area), "area");
        assert_eq!(config.namespace(ChartType::Bar), "bar");
        assert_eq!(config.search.debounce().as_millis(), 1000);
        assert_eq!(config.colors.default_color, "#004dcf");
        assert_eq!(config.layout.geometry(), Geometry::default());
        assert!(config.rules(ChartType::Bar).accepts(ValueType::Geo));
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: WizardConfig = serde_json::from_str(
            r#"{ "namespaces": { "bar": "widgets/bar" }, "charts": { "area": { "accepted_types": ["NUMBER"] } } }"#,
        )
        .unwrap();

        assert_eq!(config.namespace(ChartType::Bar), "widgets/bar");
        assert_eq!(config.namespace(ChartType::Area), "area");
        assert_eq!(config.rules(ChartType::Area).accepted_types, vec![ValueType::Number]);
        assert!(config.rules(ChartType::Area).static_supported);
        assert_eq!(config.pagination.default_page_size, 5);
    }

    #[test]
    fn test_config_error_converts() {
        let err: WizardError = ConfigError::Validation("bad".to_string()).into();
        assert!(matches!(err, WizardError::InvalidConfig { message } if message.contains("bad")));
    }
}
