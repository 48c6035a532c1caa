//! Configuration validation utilities

use crate::{
    AttributeRules, ChartNamespaces, ColorConfig, ConfigError, LayoutConfig, PaginationConfig,
    Result, SearchConfig, WizardConfig,
};
use widget_wizard_shared::is_hex_color;

/// Longest accepted search quiet window
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &WizardConfig) -> Result<()> {
        Self::validate_namespaces(&config.namespaces)?;
        Self::validate_search(&config.search)?;
        Self::validate_pagination(&config.pagination)?;
        Self::validate_colors(&config.colors)?;
        Self::validate_layout(&config.layout)?;
        Self::validate_rules("area", &config.charts.area)?;
        Self::validate_rules("bar", &config.charts.bar)?;

        Ok(())
    }

    fn validate_namespaces(namespaces: &ChartNamespaces) -> Result<()> {
        for (chart, namespace) in [("area", &namespaces.area), ("bar", &namespaces.bar)] {
            if namespace.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Namespace for {} charts cannot be empty",
                    chart
                )));
            }
        }
        Ok(())
    }

    fn validate_search(search: &SearchConfig) -> Result<()> {
        if search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "Invalid debounce_ms: {}. Must be at most {}",
                search.debounce_ms, MAX_DEBOUNCE_MS
            )));
        }
        Ok(())
    }

    fn validate_pagination(pagination: &PaginationConfig) -> Result<()> {
        if pagination.default_page_size == 0 {
            return Err(ConfigError::Validation(
                "Default page size must be greater than 0".to_string(),
            ));
        }

        if pagination.page_size_options.is_empty() {
            return Err(ConfigError::Validation(
                "Page size options cannot be empty".to_string(),
            ));
        }

        if pagination.page_size_options.contains(&0) {
            return Err(ConfigError::Validation(
                "Page size options must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_colors(colors: &ColorConfig) -> Result<()> {
        for (name, value) in [
            ("default_color", &colors.default_color),
            ("disabled_color", &colors.disabled_color),
        ] {
            if !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "Invalid {}: {:?}. Expected #rgb or #rrggbb",
                    name, value
                )));
            }
        }
        Ok(())
    }

    fn validate_layout(layout: &LayoutConfig) -> Result<()> {
        if layout.w == 0 || layout.h == 0 {
            return Err(ConfigError::Validation(format!(
                "Invalid widget size: {}x{}. Width and height must be greater than 0",
                layout.w, layout.h
            )));
        }

        if layout.min_w > layout.w || layout.min_h > layout.h {
            return Err(ConfigError::Validation(format!(
                "Minimum size {}x{} exceeds widget size {}x{}",
                layout.min_w, layout.min_h, layout.w, layout.h
            )));
        }

        Ok(())
    }

    fn validate_rules(chart: &str, rules: &AttributeRules) -> Result<()> {
        if rules.accepted_types.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Accepted value types for {} charts cannot be empty",
                chart
            )));
        }
        Ok(())
    }
}
