//! Dashboard collaborators notified when a wizard finishes

use std::collections::HashMap;
use widget_wizard_shared::{ChartSettings, WidgetDescriptor};

/// Dashboard widget registry
pub trait WidgetRegistry {
    fn add_widget(&mut self, descriptor: WidgetDescriptor);
    fn add_widget_config(&mut self, config: HashMap<String, ChartSettings>);
}

/// Host navigation
pub trait Navigator {
    fn to_dashboard(&mut self);
}

/// Registry that keeps everything it is given
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    pub widgets: Vec<WidgetDescriptor>,
    pub configs: HashMap<String, ChartSettings>,
}

impl WidgetRegistry for InMemoryRegistry {
    fn add_widget(&mut self, descriptor: WidgetDescriptor) {
        self.widgets.push(descriptor);
    }

    fn add_widget_config(&mut self, config: HashMap<String, ChartSettings>) {
        self.configs.extend(config);
    }
}

/// Navigator that counts requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingNavigator {
    pub dashboard_visits: usize,
}

impl Navigator for RecordingNavigator {
    fn to_dashboard(&mut self) {
        self.dashboard_visits += 1;
    }
}
